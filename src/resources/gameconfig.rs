//! Game configuration.
//!
//! Settings loaded from an INI configuration file, with safe defaults for
//! startup when the file is missing or partial.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 640
//! height = 360
//! filter = nearest
//!
//! [window]
//! width = 1280
//! height = 720
//! fullscreen = false
//!
//! [loop]
//! idle_ms = 25
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::info;

use crate::resources::screen::RenderFilter;

/// Default safe values for startup
const DEFAULT_RENDER_WIDTH: u32 = 640;
const DEFAULT_RENDER_HEIGHT: u32 = 360;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_IDLE_MS: u64 = 25;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Render, window, and loop settings.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Internal render width in pixels (the back buffer resolution).
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    /// Scaling filter for the back buffer.
    pub filter: RenderFilter,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Flat idle interval between loop iterations, in milliseconds.
    pub idle_ms: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            filter: RenderFilter::default(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fullscreen: DEFAULT_FULLSCREEN,
            idle_ms: DEFAULT_IDLE_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }
        if let Some(name) = config.get("render", "filter") {
            match RenderFilter::from_name(&name) {
                Some(filter) => self.filter = filter,
                None => log::warn!("unknown render filter '{}'; keeping {}", name, self.filter.name()),
            }
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [loop] section
        if let Some(idle) = config.getuint("loop", "idle_ms").ok().flatten() {
            self.idle_ms = idle;
        }

        info!(
            "Loaded config: {}x{} render ({}), {}x{} window, fullscreen={}, idle={}ms",
            self.render_width,
            self.render_height,
            self.filter.name(),
            self.window_width,
            self.window_height,
            self.fullscreen,
            self.idle_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));
        config.set("render", "filter", Some(self.filter.name().to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config.set("loop", "idle_ms", Some(self.idle_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Get the internal render size.
    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_safe() {
        let config = GameConfig::new();
        assert_eq!(config.render_size(), (640, 360));
        assert_eq!(config.window_size(), (1280, 720));
        assert_eq!(config.filter, RenderFilter::Nearest);
        assert!(!config.fullscreen);
        assert_eq!(config.idle_ms, 25);
    }

    #[test]
    fn test_load_missing_file_is_an_error_and_keeps_defaults() {
        let mut config = GameConfig::with_path("./definitely_missing_config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.render_size(), (640, 360));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let path = std::env::temp_dir().join("flitengine_roundtrip_config.ini");

        let mut saved = GameConfig::with_path(&path);
        saved.render_width = 320;
        saved.render_height = 180;
        saved.filter = RenderFilter::Bilinear;
        saved.window_width = 960;
        saved.window_height = 540;
        saved.fullscreen = true;
        saved.idle_ms = 40;
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.render_size(), (320, 180));
        assert_eq!(loaded.filter, RenderFilter::Bilinear);
        assert_eq!(loaded.window_size(), (960, 540));
        assert!(loaded.fullscreen);
        assert_eq!(loaded.idle_ms, 40);
    }

    #[test]
    fn test_unknown_filter_name_keeps_current_value() {
        let path = std::env::temp_dir().join("flitengine_bad_filter_config.ini");
        std::fs::write(&path, "[render]\nfilter = trilinear\n").unwrap();

        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.filter, RenderFilter::Nearest);
    }
}
