//! Demo game: a swarm of flies buzzing inside the render bounds.
//!
//! Exercises the whole scaffold — animated sprites, the creature hierarchy,
//! and the loop hooks — with procedurally generated textures so no asset
//! files are needed. Every few seconds one fly is swatted, which switches it
//! to its dead pose and drops it to the ground.

use raylib::prelude::{Color, Image};

use crate::components::animation::Animation;
use crate::components::creature::{Creature, Fly, LifeState};
use crate::components::sprite::Sprite;
use crate::core::{Canvas, Game, LoopControl, Surface};
use crate::error::EngineError;
use crate::resources::screen::Screen;

const FLY_WIDTH: i32 = 16;
const FLY_HEIGHT: i32 = 12;
/// Wing flap cadence per animation frame, in milliseconds.
const FLAP_MS: f32 = 120.0;
/// One fly gets swatted this often.
const SWAT_INTERVAL_MS: f32 = 5_000.0;
/// How long the demo lingers after the last fly dies.
const LINGER_MS: f32 = 2_000.0;
/// Fall speed of a swatted fly, in pixels per millisecond.
const FALL_SPEED: f32 = 0.1;

/// Demo game state driven by the loop hooks.
pub struct FlyDemo {
    flies: Vec<Fly>,
    bounds: (f32, f32),
    swat_timer_ms: f32,
    linger_ms: f32,
}

impl FlyDemo {
    /// Build the demo against an open screen: generates the fly textures,
    /// then scatters `fly_count` flies with random velocities within the
    /// fly's speed policy.
    pub fn new(screen: &mut Screen, fly_count: u32) -> Result<Self, EngineError> {
        let left = flap_animation(screen, "fly_left", Color::DARKBLUE, Color::SKYBLUE)?;
        let right = flap_animation(screen, "fly_right", Color::MAROON, Color::ORANGE)?;
        let dead_left = still_animation(screen, "fly_dead_left", Color::DARKGRAY)?;
        let dead_right = still_animation(screen, "fly_dead_right", Color::GRAY)?;

        let (w, h) = screen.dimensions();
        let bounds = (w as f32, h as f32);

        let mut flies = Vec::with_capacity(fly_count as usize);
        for _ in 0..fly_count {
            let mut fly = Fly::new(
                left.clone(),
                right.clone(),
                dead_left.clone(),
                dead_right.clone(),
            );
            let max = fly.max_speed();
            let sprite = fly.sprite_mut();
            sprite.set_position(
                fastrand::f32() * (bounds.0 - FLY_WIDTH as f32),
                fastrand::f32() * (bounds.1 - FLY_HEIGHT as f32),
            );
            sprite.set_velocity(random_component(max), random_component(max));
            flies.push(fly);
        }
        log::info!("demo ready: {} flies in {}x{}", flies.len(), w, h);

        Ok(Self {
            flies,
            bounds,
            swat_timer_ms: 0.0,
            linger_ms: 0.0,
        })
    }

    fn alive_count(&self) -> usize {
        self.flies.iter().filter(|f| f.is_flying()).count()
    }

    /// Kill the first still-flying fly. Dead flies keep their facing but
    /// fall straight down; grounding them is handled in [`advance`].
    ///
    /// [`advance`]: FlyDemo::advance
    fn swat_one(&mut self) {
        if let Some(fly) = self.flies.iter_mut().find(|f| f.is_flying()) {
            fly.kill();
            fly.sprite_mut().set_velocity(0.0, FALL_SPEED);
            log::debug!("fly swatted");
        }
    }

    /// One tick of demo logic. Returns true when the demo wants to quit.
    fn advance(&mut self, elapsed_ms: f32) -> bool {
        self.swat_timer_ms += elapsed_ms;
        if self.swat_timer_ms >= SWAT_INTERVAL_MS {
            self.swat_timer_ms -= SWAT_INTERVAL_MS;
            self.swat_one();
        }

        let bounds = self.bounds;
        for fly in &mut self.flies {
            if fly.is_flying() {
                bounce(fly.sprite_mut(), bounds);
            } else {
                ground(fly.sprite_mut(), bounds);
            }
            fly.update(elapsed_ms);
        }

        if self.alive_count() == 0 {
            self.linger_ms += elapsed_ms;
            self.linger_ms >= LINGER_MS
        } else {
            false
        }
    }
}

impl<S: Surface> Game<S> for FlyDemo {
    fn update(&mut self, control: &mut LoopControl, elapsed_ms: f32) -> Result<(), EngineError> {
        if self.advance(elapsed_ms) {
            log::info!("all flies down; stopping");
            control.request_stop();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut S::Frame<'_>) -> Result<(), EngineError> {
        frame.clear(Color::RAYWHITE);
        for fly in &self.flies {
            if let Some(image) = fly.sprite().current_image() {
                frame.draw_image(image, fly.sprite().x(), fly.sprite().y());
            }
        }
        let hud = format!("{} flies buzzing", self.alive_count());
        frame.draw_text(&hud, 8, 8, 10, Color::DARKGREEN);
        Ok(())
    }
}

/// Two-frame wing-flap animation from flat-color generated images.
fn flap_animation(
    screen: &mut Screen,
    key: &str,
    down: Color,
    up: Color,
) -> Result<Animation, EngineError> {
    let mut anim = Animation::new();
    for (i, color) in [down, up].into_iter().enumerate() {
        let image = Image::gen_image_color(FLY_WIDTH, FLY_HEIGHT, color);
        let handle = screen.register_image(&format!("{key}_{i}"), &image)?;
        anim.add_frame(handle, FLAP_MS)?;
    }
    Ok(anim)
}

/// Single-frame animation; never advances, which is exactly what a corpse
/// needs.
fn still_animation(screen: &mut Screen, key: &str, color: Color) -> Result<Animation, EngineError> {
    let image = Image::gen_image_color(FLY_WIDTH, FLY_HEIGHT, color);
    let handle = screen.register_image(key, &image)?;
    let mut anim = Animation::new();
    anim.add_frame(handle, FLAP_MS)?;
    Ok(anim)
}

/// Random velocity component in `[-max, max]` px/ms, biased away from zero
/// so every fly visibly moves.
fn random_component(max: f32) -> f32 {
    let magnitude = max * (0.25 + 0.75 * fastrand::f32());
    if fastrand::bool() { magnitude } else { -magnitude }
}

/// Reflect a sprite off the render bounds, clamping it back inside.
fn bounce(sprite: &mut Sprite, bounds: (f32, f32)) {
    let w = sprite.width() as f32;
    let h = sprite.height() as f32;
    let (max_x, max_y) = (bounds.0 - w, bounds.1 - h);

    if sprite.x() < 0.0 {
        sprite.set_position(0.0, sprite.y());
        sprite.set_velocity_x(sprite.velocity_x().abs());
    } else if sprite.x() > max_x {
        sprite.set_position(max_x, sprite.y());
        sprite.set_velocity_x(-sprite.velocity_x().abs());
    }
    if sprite.y() < 0.0 {
        sprite.set_position(sprite.x(), 0.0);
        sprite.set_velocity_y(sprite.velocity_y().abs());
    } else if sprite.y() > max_y {
        sprite.set_position(sprite.x(), max_y);
        sprite.set_velocity_y(-sprite.velocity_y().abs());
    }
}

/// Stop a falling corpse once it reaches the bottom of the bounds.
fn ground(sprite: &mut Sprite, bounds: (f32, f32)) {
    let floor = bounds.1 - sprite.height() as f32;
    if sprite.y() >= floor {
        sprite.set_position(sprite.x(), floor);
        sprite.set_velocity(0.0, 0.0);
    }
}
