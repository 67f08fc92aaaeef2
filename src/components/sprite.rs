//! Positioned, velocity-driven entity owning one animation.

use raylib::prelude::Vector2;

use crate::components::animation::Animation;
use crate::resources::texturestore::ImageHandle;

/// A sprite has a position in pixels, a velocity in pixels per millisecond,
/// and owns the [`Animation`] it displays.
#[derive(Debug, Clone)]
pub struct Sprite {
    pos: Vector2,
    vel: Vector2,
    anim: Animation,
}

impl Sprite {
    /// Create a sprite at the origin with zero velocity.
    pub fn new(anim: Animation) -> Self {
        Self {
            pos: Vector2::zero(),
            vel: Vector2::zero(),
            anim,
        }
    }

    /// Integrate position by the elapsed time, then advance the animation.
    ///
    /// Position update is exactly `pos += vel * elapsed_ms` and runs before
    /// the animation update. No failure modes.
    pub fn update(&mut self, elapsed_ms: f32) {
        self.pos += self.vel.scale_by(elapsed_ms);
        self.anim.update(elapsed_ms);
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn position(&self) -> Vector2 {
        self.pos
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vector2 { x, y };
    }

    /// Horizontal velocity in pixels per millisecond.
    pub fn velocity_x(&self) -> f32 {
        self.vel.x
    }

    /// Vertical velocity in pixels per millisecond.
    pub fn velocity_y(&self) -> f32 {
        self.vel.y
    }

    pub fn velocity(&self) -> Vector2 {
        self.vel
    }

    pub fn set_velocity(&mut self, dx: f32, dy: f32) {
        self.vel = Vector2 { x: dx, y: dy };
    }

    pub fn set_velocity_x(&mut self, dx: f32) {
        self.vel.x = dx;
    }

    pub fn set_velocity_y(&mut self, dy: f32) {
        self.vel.y = dy;
    }

    pub fn animation(&self) -> &Animation {
        &self.anim
    }

    pub fn animation_mut(&mut self) -> &mut Animation {
        &mut self.anim
    }

    /// Replace the owned animation. The incoming animation keeps whatever
    /// playback position it carries; callers wanting a rewind pass
    /// [`Animation::fresh`] or call [`Animation::restart`] themselves.
    pub fn set_animation(&mut self, anim: Animation) {
        self.anim = anim;
    }

    /// Image of the current animation frame, if any.
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.anim.current_image()
    }

    /// Width of the current frame image in pixels. Zero when no image is
    /// resolvable; draw code depends on this every frame, so it never fails.
    pub fn width(&self) -> u32 {
        self.anim.current_image().map_or(0, |img| img.width())
    }

    /// Height of the current frame image in pixels. Zero when no image is
    /// resolvable.
    pub fn height(&self) -> u32 {
        self.anim.current_image().map_or(0, |img| img.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn img(key: &str, w: u32, h: u32) -> ImageHandle {
        ImageHandle::new(key, w, h)
    }

    fn anim_with_two_frames() -> Animation {
        let mut anim = Animation::new();
        anim.add_frame(img("a", 16, 12), 100.0).unwrap();
        anim.add_frame(img("b", 20, 14), 200.0).unwrap();
        anim
    }

    // ==================== MOTION TESTS ====================

    #[test]
    fn test_update_integrates_position_exactly() {
        let mut sprite = Sprite::new(Animation::new());
        sprite.set_position(10.0, 20.0);
        sprite.set_velocity(0.5, -0.25);
        sprite.update(40.0);
        // f32 products of these values are exact.
        assert_eq!(sprite.x(), 10.0 + 0.5 * 40.0);
        assert_eq!(sprite.y(), 20.0 + -0.25 * 40.0);
    }

    #[test]
    fn test_update_with_zero_elapsed_is_stationary() {
        let mut sprite = Sprite::new(Animation::new());
        sprite.set_position(3.0, 4.0);
        sprite.set_velocity(1.0, 1.0);
        sprite.update(0.0);
        assert_eq!(sprite.x(), 3.0);
        assert_eq!(sprite.y(), 4.0);
    }

    #[test]
    fn test_update_advances_owned_animation() {
        let mut sprite = Sprite::new(anim_with_two_frames());
        sprite.update(150.0);
        assert_eq!(sprite.current_image().unwrap().key(), "b");
    }

    // ==================== DIMENSION TESTS ====================

    #[test]
    fn test_dimensions_follow_current_frame() {
        let mut sprite = Sprite::new(anim_with_two_frames());
        assert_eq!((sprite.width(), sprite.height()), (16, 12));
        sprite.update(150.0);
        assert_eq!((sprite.width(), sprite.height()), (20, 14));
    }

    #[test]
    fn test_dimensions_degenerate_without_frames() {
        let sprite = Sprite::new(Animation::new());
        assert_eq!(sprite.width(), 0);
        assert_eq!(sprite.height(), 0);
        assert!(sprite.current_image().is_none());
    }

    // ==================== ANIMATION SWAP TESTS ====================

    #[test]
    fn test_set_animation_keeps_playback_position() {
        let mut other = anim_with_two_frames();
        other.update(150.0);

        let mut sprite = Sprite::new(Animation::new());
        sprite.set_animation(other);
        assert_eq!(sprite.current_image().unwrap().key(), "b");
    }

    #[test]
    fn test_set_animation_fresh_rewinds() {
        let mut other = anim_with_two_frames();
        other.update(150.0);

        let mut sprite = Sprite::new(Animation::new());
        sprite.set_animation(other.fresh());
        assert_eq!(sprite.current_image().unwrap().key(), "a");
    }

    #[test]
    fn test_invalid_duration_error_reaches_caller() {
        let mut anim = Animation::new();
        let err = anim.add_frame(img("bad", 1, 1), -1.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDuration(d) if d == -1.0));
    }
}
