//! Flit Engine library.
//!
//! A small educational 2D game scaffold built on **raylib**: a fixed-idle
//! main loop that separates update from draw, sprites integrated by elapsed
//! milliseconds, frame-based cyclic animations, and a shallow creature
//! hierarchy (a flying `Fly` and a crawling `Grub`).
//!
//! Module overview:
//! - [`components`] – sprites, animations, and the creature hierarchy
//! - [`core`] – the loop driver and the narrow `Surface`/`Canvas` contracts
//! - [`resources`] – configuration, the texture store, and the raylib screen
//! - [`game`] – the demo game driven by the `flitengine` binary
//! - [`error`] – the engine error type

pub mod components;
pub mod core;
pub mod error;
pub mod game;
pub mod resources;
