//! Creature hierarchy: sprites with a life state and policy constants.
//!
//! A creature is a [`Sprite`] plus an alive/dead state and four directional
//! animation definitions (left, right, dead-left, dead-right). Variants only
//! supply tunable policy values (`max_speed`) and predicates (`is_flying`)
//! consumed by the movement layer; no movement decisions are made here.

use crate::components::animation::Animation;
use crate::components::sprite::Sprite;

/// Alive/dead state. The transition is one-way: [`Monster::kill`] moves a
/// creature to `Dead` and nothing moves it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Which of the four directional animations is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Left,
    Right,
    DeadLeft,
    DeadRight,
}

/// Shared data and behavior for monster variants.
///
/// Holds the four animation definitions; the sprite plays a fresh copy of
/// whichever one the current pose selects, so two monsters sharing the same
/// definitions never share playback position.
#[derive(Debug, Clone)]
pub struct Monster {
    sprite: Sprite,
    left: Animation,
    right: Animation,
    dead_left: Animation,
    dead_right: Animation,
    state: LifeState,
    pose: Pose,
}

impl Monster {
    /// Build a monster from its four directional animations. Starts alive
    /// and facing left.
    pub fn new(
        left: Animation,
        right: Animation,
        dead_left: Animation,
        dead_right: Animation,
    ) -> Self {
        Self {
            sprite: Sprite::new(left.fresh()),
            left,
            right,
            dead_left,
            dead_right,
            state: LifeState::Alive,
            pose: Pose::Left,
        }
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    /// One-way transition to `Dead`. Idempotent. What happens to the
    /// velocity of a dead creature is the owning game layer's policy.
    pub fn kill(&mut self) {
        self.state = LifeState::Dead;
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Pick the pose matching the current life state and horizontal
    /// velocity sign. When the pose changes, a fresh copy of the matching
    /// animation replaces the sprite's current one.
    ///
    /// Zero horizontal velocity keeps the current facing.
    pub fn refresh_pose(&mut self) {
        let facing_left = match self.pose {
            Pose::Left | Pose::DeadLeft => true,
            Pose::Right | Pose::DeadRight => false,
        };
        let dx = self.sprite.velocity_x();
        let facing_left = if dx < 0.0 {
            true
        } else if dx > 0.0 {
            false
        } else {
            facing_left
        };
        let target = match (self.state, facing_left) {
            (LifeState::Alive, true) => Pose::Left,
            (LifeState::Alive, false) => Pose::Right,
            (LifeState::Dead, true) => Pose::DeadLeft,
            (LifeState::Dead, false) => Pose::DeadRight,
        };
        if target != self.pose {
            self.pose = target;
            let definition = match target {
                Pose::Left => &self.left,
                Pose::Right => &self.right,
                Pose::DeadLeft => &self.dead_left,
                Pose::DeadRight => &self.dead_right,
            };
            self.sprite.set_animation(definition.fresh());
        }
    }

    /// Refresh the pose, then advance the sprite by the elapsed time.
    pub fn update(&mut self, elapsed_ms: f32) {
        self.refresh_pose();
        self.sprite.update(elapsed_ms);
    }
}

/// Capability set every creature variant exposes to the movement/AI layer.
pub trait Creature {
    /// Maximum speed policy value in pixels per millisecond.
    fn max_speed(&self) -> f32;

    /// Whether the creature is airborne. Most creatures are not.
    fn is_flying(&self) -> bool {
        false
    }

    fn state(&self) -> LifeState;

    fn kill(&mut self);

    fn sprite(&self) -> &Sprite;

    fn sprite_mut(&mut self) -> &mut Sprite;

    /// Advance the creature by the elapsed time.
    fn update(&mut self, elapsed_ms: f32);
}

/// A fly: a monster that flies slowly in the air while it is alive.
#[derive(Debug, Clone)]
pub struct Fly {
    monster: Monster,
}

impl Fly {
    pub const MAX_SPEED: f32 = 0.2;

    pub fn new(
        left: Animation,
        right: Animation,
        dead_left: Animation,
        dead_right: Animation,
    ) -> Self {
        Self {
            monster: Monster::new(left, right, dead_left, dead_right),
        }
    }

    pub fn pose(&self) -> Pose {
        self.monster.pose()
    }
}

impl Creature for Fly {
    fn max_speed(&self) -> f32 {
        Self::MAX_SPEED
    }

    fn is_flying(&self) -> bool {
        self.monster.is_alive()
    }

    fn state(&self) -> LifeState {
        self.monster.state()
    }

    fn kill(&mut self) {
        self.monster.kill();
    }

    fn sprite(&self) -> &Sprite {
        self.monster.sprite()
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        self.monster.sprite_mut()
    }

    fn update(&mut self, elapsed_ms: f32) {
        self.monster.update(elapsed_ms);
    }
}

/// A grub: a monster that crawls slowly on the ground.
#[derive(Debug, Clone)]
pub struct Grub {
    monster: Monster,
}

impl Grub {
    pub const MAX_SPEED: f32 = 0.05;

    pub fn new(
        left: Animation,
        right: Animation,
        dead_left: Animation,
        dead_right: Animation,
    ) -> Self {
        Self {
            monster: Monster::new(left, right, dead_left, dead_right),
        }
    }
}

impl Creature for Grub {
    fn max_speed(&self) -> f32 {
        Self::MAX_SPEED
    }

    fn state(&self) -> LifeState {
        self.monster.state()
    }

    fn kill(&mut self) {
        self.monster.kill();
    }

    fn sprite(&self) -> &Sprite {
        self.monster.sprite()
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        self.monster.sprite_mut()
    }

    fn update(&mut self, elapsed_ms: f32) {
        self.monster.update(elapsed_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::texturestore::ImageHandle;

    fn anim(key: &str) -> Animation {
        let mut a = Animation::new();
        a.add_frame(ImageHandle::new(key, 16, 12), 100.0).unwrap();
        a
    }

    fn make_fly() -> Fly {
        Fly::new(anim("left"), anim("right"), anim("dead_left"), anim("dead_right"))
    }

    fn current_key(c: &dyn Creature) -> &str {
        c.sprite().current_image().expect("creature has frames").key()
    }

    // ==================== LIFE STATE TESTS ====================

    #[test]
    fn test_fly_is_flying_while_alive() {
        let fly = make_fly();
        assert_eq!(fly.state(), LifeState::Alive);
        assert!(fly.is_flying());
    }

    #[test]
    fn test_fly_stops_flying_permanently_when_dead() {
        let mut fly = make_fly();
        fly.kill();
        assert_eq!(fly.state(), LifeState::Dead);
        assert!(!fly.is_flying());
        // Still dead after more updates; the transition is one-way.
        fly.update(500.0);
        assert_eq!(fly.state(), LifeState::Dead);
        assert!(!fly.is_flying());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut fly = make_fly();
        fly.kill();
        fly.kill();
        assert_eq!(fly.state(), LifeState::Dead);
    }

    #[test]
    fn test_grub_never_flies() {
        let grub = Grub::new(anim("l"), anim("r"), anim("dl"), anim("dr"));
        assert!(!grub.is_flying());
    }

    // ==================== POLICY TESTS ====================

    #[test]
    fn test_max_speed_policy_values() {
        let fly = make_fly();
        let grub = Grub::new(anim("l"), anim("r"), anim("dl"), anim("dr"));
        assert_eq!(fly.max_speed(), 0.2);
        assert_eq!(grub.max_speed(), 0.05);
    }

    // ==================== POSE SELECTION TESTS ====================

    #[test]
    fn test_pose_follows_velocity_sign() {
        let mut fly = make_fly();
        assert_eq!(current_key(&fly), "left");

        fly.sprite_mut().set_velocity(0.1, 0.0);
        fly.update(10.0);
        assert_eq!(fly.pose(), Pose::Right);
        assert_eq!(current_key(&fly), "right");

        fly.sprite_mut().set_velocity(-0.1, 0.0);
        fly.update(10.0);
        assert_eq!(fly.pose(), Pose::Left);
        assert_eq!(current_key(&fly), "left");
    }

    #[test]
    fn test_zero_velocity_keeps_facing() {
        let mut fly = make_fly();
        fly.sprite_mut().set_velocity(0.1, 0.0);
        fly.update(10.0);
        assert_eq!(fly.pose(), Pose::Right);

        fly.sprite_mut().set_velocity(0.0, 0.0);
        fly.update(10.0);
        assert_eq!(fly.pose(), Pose::Right);
    }

    #[test]
    fn test_dead_pose_keeps_facing() {
        let mut fly = make_fly();
        fly.sprite_mut().set_velocity(0.1, 0.0);
        fly.update(10.0);
        fly.kill();
        fly.sprite_mut().set_velocity(0.0, 0.0);
        fly.update(10.0);
        assert_eq!(fly.pose(), Pose::DeadRight);
        assert_eq!(current_key(&fly), "dead_right");
    }
}
