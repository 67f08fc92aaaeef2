//! Long-lived engine resources.
//!
//! Overview
//! - [`gameconfig`] – render/window/loop settings loaded from an INI file
//! - [`screen`] – raylib window plus fixed-resolution back buffer
//! - [`texturestore`] – loaded textures keyed by string IDs, and the opaque
//!   image handle the rest of the engine passes around

pub mod gameconfig;
pub mod screen;
pub mod texturestore;
