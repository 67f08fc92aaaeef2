//! Frame-based cyclic animation.
//!
//! An [`Animation`] is an ordered sequence of timed image frames. It tracks
//! how far playback has advanced into the current frame and exposes the
//! image that should be visible right now. Sequences are cyclic: after the
//! last frame, playback wraps to the first.

use smallvec::SmallVec;

use crate::error::EngineError;
use crate::resources::texturestore::ImageHandle;

/// One timed frame of an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Image shown while this frame is active.
    pub image: ImageHandle,
    /// How long the frame stays visible, in milliseconds. Always finite
    /// and > 0 (enforced by [`Animation::add_frame`]).
    pub duration: f32,
}

/// Ordered, cyclic sequence of timed image frames with a playback cursor.
///
/// `Clone` duplicates the definition *and* the cursor; use [`Animation::fresh`]
/// when several sprites should reuse one definition without sharing playback
/// position. Image handles are shared between copies, since textures are
/// immutable resources.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    frames: SmallVec<[Frame; 8]>,
    frame_index: usize,
    frame_time: f32,
}

impl Animation {
    /// Create an empty animation. Frames are appended with [`add_frame`].
    ///
    /// [`add_frame`]: Animation::add_frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame showing `image` for `duration_ms` milliseconds.
    ///
    /// Appending is always allowed and takes immediate effect, even after
    /// playback has started. The duration must be finite and greater than
    /// zero.
    pub fn add_frame(&mut self, image: ImageHandle, duration_ms: f32) -> Result<(), EngineError> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(EngineError::InvalidDuration(duration_ms));
        }
        self.frames.push(Frame {
            image,
            duration: duration_ms,
        });
        Ok(())
    }

    /// Advance playback by `elapsed_ms` milliseconds.
    ///
    /// A sequence with zero or one frame never advances. Otherwise the time
    /// within the current frame grows by `elapsed_ms`, and whole frame
    /// durations are consumed one by one, wrapping to the first frame after
    /// the last.
    pub fn update(&mut self, elapsed_ms: f32) {
        if self.frames.len() < 2 || elapsed_ms <= 0.0 {
            return;
        }
        // Whole cycles are invisible; shed them up front so the frame walk
        // below is bounded regardless of how large the elapsed time is.
        let total = self.total_duration();
        let mut remaining = elapsed_ms;
        if remaining >= total {
            remaining %= total;
        }
        self.frame_time += remaining;
        while self.frame_time >= self.frames[self.frame_index].duration {
            self.frame_time -= self.frames[self.frame_index].duration;
            self.frame_index = (self.frame_index + 1) % self.frames.len();
        }
    }

    /// Image of the frame currently being shown. `None` for an empty
    /// animation. Pure query, no side effects.
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.frames.get(self.frame_index).map(|f| &f.image)
    }

    /// Rewind playback to the start of the first frame.
    pub fn restart(&mut self) {
        self.frame_index = 0;
        self.frame_time = 0.0;
    }

    /// Duplicate this animation definition with a fresh playback cursor.
    ///
    /// The copy shares image handles with the original but tracks its own
    /// position, so many sprites can play one definition independently.
    pub fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.restart();
        copy
    }

    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all frame durations in milliseconds.
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }
}
