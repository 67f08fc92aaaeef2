//! Game-object building blocks.
//!
//! Submodules overview:
//! - [`animation`] – ordered, cyclic sequences of timed image frames
//! - [`sprite`] – positioned, velocity-driven entity owning one animation
//! - [`creature`] – alive/dead monsters with per-variant policy constants

pub mod animation;
pub mod creature;
pub mod sprite;
