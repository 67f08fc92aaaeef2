//! Engine-wide error type.
//!
//! The scaffold keeps one small error enum: animation construction can be
//! misconfigured, the display surface can fail to open, the loop driver can
//! be misused, and game hooks can fault. Everything else is handled with
//! degenerate values (see the surface queries) rather than errors.

use thiserror::Error;

/// Errors surfaced by the engine core.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An animation frame was added with a duration that is not a positive,
    /// finite number of milliseconds. A content-authoring bug; propagates to
    /// whoever is building the animation.
    #[error("invalid animation frame duration: {0} ms (must be finite and > 0)")]
    InvalidDuration(f32),

    /// The display surface could not be created or a texture upload failed.
    #[error("display surface error: {0}")]
    Surface(String),

    /// The loop driver was used outside its state machine, e.g. `run()`
    /// before `init()`.
    #[error("loop driver error: {0}")]
    LoopState(&'static str),

    /// A fault raised by an external update/draw hook. The driver never
    /// swallows or retries these; it tears the surface down and lets them
    /// propagate.
    #[error("game hook fault: {0}")]
    Game(String),
}
