//! Loop driver and the narrow host-surface contract.
//!
//! The driver owns one [`Surface`] and repeats measure → update → draw →
//! present → idle until a stop is requested. Game logic lives entirely in
//! the externally supplied [`Game`] hooks; the loop itself knows nothing
//! about sprites or creatures.
//!
//! Resource guarantee: [`Surface::teardown`] runs exactly once on every exit
//! path out of [`GameLoop::run`], including hook faults. Hook faults are
//! never swallowed or retried; they propagate to the caller after teardown.

use std::thread;
use std::time::{Duration, Instant};

use raylib::prelude::Color;

use crate::error::EngineError;
use crate::resources::texturestore::ImageHandle;

/// Fixed idle interval between loop iterations. A crude frame-rate cap, not
/// a precise scheduler: the sleep is flat regardless of how long the
/// iteration took, so the real frame rate varies under load.
pub const DEFAULT_IDLE: Duration = Duration::from_millis(25);

/// Drawing operations available to the draw hook for one frame.
///
/// This is the whole drawing contract: the engine core never needs more than
/// clearing, blitting opaque images, and HUD text.
pub trait Canvas {
    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    /// Draw the image referenced by `image` with its top-left corner at
    /// (`x`, `y`). Unresolvable handles are skipped, never fatal.
    fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color);
}

/// The narrow contract a host window/surface provider must supply.
///
/// The back buffer is acquired as a scoped frame: the frame mutably borrows
/// the surface, so at most one is outstanding and it is necessarily released
/// (dropped) before [`present`](Surface::present) can be called.
pub trait Surface {
    type Frame<'a>: Canvas
    where
        Self: 'a;

    /// Acquire a drawing frame for the back buffer. `None` when the surface
    /// is not (or no longer) initialized; the iteration then skips drawing.
    fn acquire_frame(&mut self) -> Option<Self::Frame<'_>>;

    /// Flip the back buffer to the front. When the host environment reports
    /// that the buffer contents were lost, the swap is silently skipped;
    /// the next iteration redraws. Never an error.
    fn present(&mut self);

    /// Current drawable size, `(0, 0)` when uninitialized or torn down.
    fn dimensions(&self) -> (u32, u32);

    /// Whether the host asked for the window to close.
    fn close_requested(&self) -> bool {
        false
    }

    /// Release host window resources. Idempotent.
    fn teardown(&mut self);
}

/// Lifecycle of the loop driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Uninitialized,
    Initialized,
    Running,
    Stopped,
    TornDown,
}

/// Cooperative stop flag handed to the update hook.
///
/// The flag is checked once per iteration boundary, so an iteration in
/// progress always completes (draw and present included) before the loop
/// exits.
#[derive(Debug, Default)]
pub struct LoopControl {
    stop: bool,
}

impl LoopControl {
    /// Signal the loop that it is time to quit. Does not interrupt the
    /// iteration in flight.
    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop
    }
}

/// External hooks supplying all game-specific behavior.
pub trait Game<S: Surface> {
    /// Advance game state by `elapsed_ms` milliseconds. May request a stop
    /// through `control`. Faults propagate out of the loop.
    fn update(&mut self, control: &mut LoopControl, elapsed_ms: f32) -> Result<(), EngineError>;

    /// Draw the current game state onto the acquired frame.
    fn draw(&mut self, frame: &mut S::Frame<'_>) -> Result<(), EngineError>;
}

/// Orchestrates init → repeated (measure → update → draw → present → idle) →
/// teardown over one [`Surface`].
pub struct GameLoop<S: Surface> {
    surface: Option<S>,
    state: LoopState,
    control: LoopControl,
    idle: Duration,
}

impl<S: Surface> Default for GameLoop<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> GameLoop<S> {
    pub fn new() -> Self {
        Self {
            surface: None,
            state: LoopState::Uninitialized,
            control: LoopControl::default(),
            idle: DEFAULT_IDLE,
        }
    }

    /// Replace the flat per-iteration idle interval.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    /// Hand the driver its surface. Valid once, from `Uninitialized`.
    pub fn init(&mut self, surface: S) -> Result<(), EngineError> {
        if self.state != LoopState::Uninitialized {
            return Err(EngineError::LoopState("init() called twice"));
        }
        self.surface = Some(surface);
        self.state = LoopState::Initialized;
        Ok(())
    }

    /// Set the stop flag; the next loop boundary check exits.
    pub fn request_stop(&mut self) {
        self.control.request_stop();
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Drawable size of the owned surface, `(0, 0)` before `init()`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.as_ref().map_or((0, 0), |s| s.dimensions())
    }

    /// Borrow the owned surface, if any.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Consume the driver and recover the surface (torn down once `run`
    /// has returned).
    pub fn into_surface(self) -> Option<S> {
        self.surface
    }

    /// Run the loop to completion.
    ///
    /// Exits when a stop was requested, the host asked to close, or a hook
    /// faulted. The surface is torn down exactly once on every one of those
    /// paths before this returns.
    pub fn run<G: Game<S>>(&mut self, game: &mut G) -> Result<(), EngineError> {
        if self.state != LoopState::Initialized {
            return Err(EngineError::LoopState("run() requires init() first"));
        }
        let Some(mut surface) = self.surface.take() else {
            return Err(EngineError::LoopState("surface missing"));
        };
        self.state = LoopState::Running;
        log::info!("game loop running ({}x{})", surface.dimensions().0, surface.dimensions().1);

        let result = self.drive(&mut surface, game);

        surface.teardown();
        self.surface = Some(surface);
        self.state = LoopState::TornDown;
        log::info!("game loop torn down");
        result
    }

    fn drive<G: Game<S>>(&mut self, surface: &mut S, game: &mut G) -> Result<(), EngineError> {
        let mut previous = Instant::now();
        while !self.control.stop_requested() && !surface.close_requested() {
            previous = Self::run_iteration(surface, &mut self.control, game, previous)?;
            if !self.idle.is_zero() {
                thread::sleep(self.idle);
            }
        }
        self.state = LoopState::Stopped;
        log::debug!("game loop stopped");
        Ok(())
    }

    /// One measure → update → draw → present cycle. Returns the timestamp
    /// to measure the next iteration against.
    fn run_iteration<G: Game<S>>(
        surface: &mut S,
        control: &mut LoopControl,
        game: &mut G,
        previous: Instant,
    ) -> Result<Instant, EngineError> {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(previous).as_secs_f32() * 1000.0;

        game.update(control, elapsed_ms)?;

        if let Some(mut frame) = surface.acquire_frame() {
            game.draw(&mut frame)?;
        }
        // The frame guard has been dropped here; the back buffer is released
        // on every path, including a faulting draw hook.
        surface.present();

        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A surface that records every interaction instead of touching a window.
    #[derive(Default)]
    struct FakeSurface {
        acquires: u32,
        presents: u32,
        swaps: u32,
        teardowns: u32,
        contents_lost: bool,
        torn_down: bool,
        ops: Vec<String>,
    }

    struct FakeFrame<'a> {
        ops: &'a mut Vec<String>,
    }

    impl Canvas for FakeFrame<'_> {
        fn size(&self) -> (u32, u32) {
            (320, 240)
        }

        fn clear(&mut self, _color: Color) {
            self.ops.push("clear".into());
        }

        fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32) {
            self.ops.push(format!("image {} @{x},{y}", image.key()));
        }

        fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _size: i32, _color: Color) {
            self.ops.push(format!("text {text}"));
        }
    }

    impl Surface for FakeSurface {
        type Frame<'a> = FakeFrame<'a>;

        fn acquire_frame(&mut self) -> Option<FakeFrame<'_>> {
            if self.torn_down {
                return None;
            }
            self.acquires += 1;
            Some(FakeFrame { ops: &mut self.ops })
        }

        fn present(&mut self) {
            self.presents += 1;
            if !self.contents_lost && !self.torn_down {
                self.swaps += 1;
            }
        }

        fn dimensions(&self) -> (u32, u32) {
            if self.torn_down { (0, 0) } else { (320, 240) }
        }

        fn teardown(&mut self) {
            self.teardowns += 1;
            self.torn_down = true;
        }
    }

    // Hooks that stop or fault after a configured number of updates.
    struct ScriptedGame {
        updates: u32,
        draws: u32,
        stop_on_update: Option<u32>,
        fault_on_update: Option<u32>,
        elapsed_seen: Vec<f32>,
    }

    impl ScriptedGame {
        fn stopping_after(n: u32) -> Self {
            Self {
                updates: 0,
                draws: 0,
                stop_on_update: Some(n),
                fault_on_update: None,
                elapsed_seen: Vec::new(),
            }
        }

        fn faulting_on(n: u32) -> Self {
            Self {
                updates: 0,
                draws: 0,
                stop_on_update: None,
                fault_on_update: Some(n),
                elapsed_seen: Vec::new(),
            }
        }
    }

    impl Game<FakeSurface> for ScriptedGame {
        fn update(&mut self, control: &mut LoopControl, elapsed_ms: f32) -> Result<(), EngineError> {
            self.updates += 1;
            self.elapsed_seen.push(elapsed_ms);
            if self.fault_on_update == Some(self.updates) {
                return Err(EngineError::Game("scripted fault".into()));
            }
            if self.stop_on_update == Some(self.updates) {
                control.request_stop();
            }
            Ok(())
        }

        fn draw(&mut self, frame: &mut FakeFrame<'_>) -> Result<(), EngineError> {
            self.draws += 1;
            frame.clear(Color::BLACK);
            Ok(())
        }
    }

    fn fast_loop() -> GameLoop<FakeSurface> {
        GameLoop::new().with_idle(Duration::ZERO)
    }

    // ==================== LIFECYCLE TESTS ====================

    #[test]
    fn test_dimensions_degenerate_before_init() {
        let driver = fast_loop();
        assert_eq!(driver.state(), LoopState::Uninitialized);
        assert_eq!(driver.dimensions(), (0, 0));
    }

    #[test]
    fn test_run_before_init_is_an_error() {
        let mut driver = fast_loop();
        let mut game = ScriptedGame::stopping_after(1);
        assert!(matches!(
            driver.run(&mut game),
            Err(EngineError::LoopState(_))
        ));
    }

    #[test]
    fn test_init_twice_is_an_error() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        assert!(driver.init(FakeSurface::default()).is_err());
    }

    #[test]
    fn test_states_progress_to_torn_down() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        assert_eq!(driver.state(), LoopState::Initialized);
        let mut game = ScriptedGame::stopping_after(1);
        driver.run(&mut game).unwrap();
        assert_eq!(driver.state(), LoopState::TornDown);
        assert_eq!(driver.dimensions(), (0, 0));
    }

    // ==================== STOP SEMANTIC TESTS ====================

    #[test]
    fn test_stop_mid_update_still_completes_the_iteration() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        let mut game = ScriptedGame::stopping_after(1);
        driver.run(&mut game).unwrap();

        // The iteration that requested the stop still drew and presented,
        // and no further iteration ran.
        assert_eq!(game.updates, 1);
        assert_eq!(game.draws, 1);
        let surface = driver.surface().unwrap();
        assert_eq!(surface.acquires, 1);
        assert_eq!(surface.presents, 1);
        assert_eq!(surface.teardowns, 1);
    }

    #[test]
    fn test_stop_after_three_iterations() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        let mut game = ScriptedGame::stopping_after(3);
        driver.run(&mut game).unwrap();
        assert_eq!(game.updates, 3);
        assert_eq!(game.draws, 3);
        assert_eq!(driver.surface().unwrap().presents, 3);
    }

    #[test]
    fn test_stop_requested_before_run_exits_without_iterating() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        driver.request_stop();
        let mut game = ScriptedGame::stopping_after(u32::MAX);
        driver.run(&mut game).unwrap();
        assert_eq!(game.updates, 0);
        assert_eq!(driver.surface().unwrap().teardowns, 1);
    }

    // ==================== FAULT PATH TESTS ====================

    #[test]
    fn test_hook_fault_propagates_after_teardown() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        let mut game = ScriptedGame::faulting_on(2);
        let err = driver.run(&mut game).unwrap_err();
        assert!(matches!(err, EngineError::Game(_)));

        // The faulting iteration never reached draw/present, but teardown
        // still ran exactly once.
        assert_eq!(game.updates, 2);
        assert_eq!(game.draws, 1);
        let surface = driver.surface().unwrap();
        assert_eq!(surface.presents, 1);
        assert_eq!(surface.teardowns, 1);
        assert_eq!(driver.state(), LoopState::TornDown);
    }

    // ==================== SURFACE CONTRACT TESTS ====================

    #[test]
    fn test_present_skips_swap_on_content_loss() {
        let mut driver = fast_loop();
        driver
            .init(FakeSurface {
                contents_lost: true,
                ..FakeSurface::default()
            })
            .unwrap();
        let mut game = ScriptedGame::stopping_after(2);
        driver.run(&mut game).unwrap();

        // Presents happened every iteration and never errored; the swap was
        // silently omitted each time.
        let surface = driver.surface().unwrap();
        assert_eq!(surface.presents, 2);
        assert_eq!(surface.swaps, 0);
    }

    #[test]
    fn test_torn_down_surface_yields_no_frames() {
        let mut surface = FakeSurface::default();
        surface.teardown();
        surface.teardown(); // idempotent for callers
        assert!(surface.acquire_frame().is_none());
        assert_eq!(surface.dimensions(), (0, 0));
    }

    #[test]
    fn test_elapsed_times_are_non_negative() {
        let mut driver = fast_loop();
        driver.init(FakeSurface::default()).unwrap();
        let mut game = ScriptedGame::stopping_after(5);
        driver.run(&mut game).unwrap();
        assert_eq!(game.elapsed_seen.len(), 5);
        assert!(game.elapsed_seen.iter().all(|&e| e >= 0.0));
    }
}
