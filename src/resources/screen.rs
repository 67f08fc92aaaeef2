//! Raylib-backed display surface.
//!
//! [`Screen`] owns the host window and a fixed-resolution render texture
//! used as the back buffer. Draw hooks render into the texture through a
//! [`ScreenCanvas`]; presenting scales the texture into the window with
//! letterboxing, so the game renders at one resolution regardless of the
//! window size.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

use crate::core::{Canvas, Surface};
use crate::error::EngineError;
use crate::resources::gameconfig::GameConfig;
use crate::resources::texturestore::{ImageHandle, TextureStore};

const WINDOW_TITLE: &str = "Flit Engine";

/// Texture filtering mode for scaling the back buffer to the window.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum RenderFilter {
    /// Point/nearest-neighbor filtering. Sharp pixels, best for pixel art.
    #[default]
    Nearest,
    /// Bilinear filtering. Smooth interpolated scaling.
    Bilinear,
}

impl RenderFilter {
    /// Parse a filter name as written in the configuration file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            _ => None,
        }
    }

    /// Name of the filter as written in the configuration file.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }
}

/// Double-buffered drawable surface tied to the host window.
pub struct Screen {
    rl: RaylibHandle,
    thread: RaylibThread,
    /// Back buffer. `None` once torn down.
    target: Option<RenderTexture2D>,
    textures: TextureStore,
    game_width: u32,
    game_height: u32,
    filter: RenderFilter,
}

impl Screen {
    /// Open the host window and create the back buffer at the configured
    /// render resolution.
    pub fn open(config: &GameConfig) -> Result<Self, EngineError> {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .resizable()
            .title(WINDOW_TITLE)
            .build();

        if config.fullscreen && !rl.is_window_fullscreen() {
            rl.toggle_fullscreen();
        }

        let target = rl
            .load_render_texture(&thread, config.render_width, config.render_height)
            .map_err(|e| EngineError::Surface(format!("failed to create render texture: {e}")))?;

        log::info!(
            "screen opened: {}x{} render in a {}x{} window",
            config.render_width,
            config.render_height,
            config.window_width,
            config.window_height
        );

        let mut screen = Self {
            rl,
            thread,
            target: Some(target),
            textures: TextureStore::new(),
            game_width: config.render_width,
            game_height: config.render_height,
            filter: config.filter,
        };
        screen.apply_filter();
        Ok(screen)
    }

    /// Current back-buffer scaling filter.
    pub fn filter(&self) -> RenderFilter {
        self.filter
    }

    /// Change the back-buffer scaling filter. Takes effect immediately.
    pub fn set_filter(&mut self, filter: RenderFilter) {
        self.filter = filter;
        self.apply_filter();
    }

    /// Apply the current filter setting to the back buffer via FFI.
    fn apply_filter(&mut self) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let filter_value = match self.filter {
            RenderFilter::Nearest => TextureFilter::TEXTURE_FILTER_POINT as i32,
            RenderFilter::Bilinear => TextureFilter::TEXTURE_FILTER_BILINEAR as i32,
        };
        unsafe {
            ffi::SetTextureFilter(target.texture, filter_value);
        }
    }

    /// Upload a CPU image as a texture and register it under `key`.
    ///
    /// Where the image comes from (files, generators) is the caller's
    /// concern; the engine only ever sees the returned handle.
    pub fn register_image(
        &mut self,
        key: &str,
        image: &Image,
    ) -> Result<ImageHandle, EngineError> {
        let texture = self
            .rl
            .load_texture_from_image(&self.thread, image)
            .map_err(|e| EngineError::Surface(format!("failed to upload texture '{key}': {e}")))?;
        Ok(self.textures.insert(key, texture))
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    /// Whether the host window cannot show the back buffer right now. The
    /// present is skipped for such frames and the next iteration redraws.
    fn contents_lost(&self) -> bool {
        !self.rl.is_window_ready() || self.rl.is_window_hidden()
    }
}

/// Scoped drawing frame over the screen's back buffer.
///
/// Dropping the canvas ends the texture mode, releasing the back buffer.
pub struct ScreenCanvas<'a> {
    d: RaylibTextureMode<'a, RaylibHandle>,
    textures: &'a TextureStore,
    size: (u32, u32),
}

impl Canvas for ScreenCanvas<'_> {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.d.clear_background(color);
    }

    fn draw_image(&mut self, image: &ImageHandle, x: f32, y: f32) {
        if let Some(texture) = self.textures.get(image.key()) {
            self.d.draw_texture(texture, x as i32, y as i32, Color::WHITE);
        } else {
            log::debug!("skipping draw of unresolved image '{}'", image.key());
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Color) {
        self.d.draw_text(text, x, y, size, color);
    }
}

impl Surface for Screen {
    type Frame<'a> = ScreenCanvas<'a>;

    fn acquire_frame(&mut self) -> Option<ScreenCanvas<'_>> {
        let target = self.target.as_mut()?;
        let d = self.rl.begin_texture_mode(&self.thread, target);
        Some(ScreenCanvas {
            d,
            textures: &self.textures,
            size: (self.game_width, self.game_height),
        })
    }

    fn present(&mut self) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        if self.contents_lost() {
            log::debug!("window contents lost; skipping present");
            return;
        }

        let game_w = self.game_width as f32;
        let game_h = self.game_height as f32;
        let win_w = self.rl.get_screen_width() as f32;
        let win_h = self.rl.get_screen_height() as f32;

        // Negative source height flips the Y axis, compensating for
        // OpenGL's inverted texture coordinates.
        let source = Rectangle {
            x: 0.0,
            y: 0.0,
            width: game_w,
            height: -game_h,
        };
        let scale = (win_w / game_w).min(win_h / game_h);
        let dest = Rectangle {
            x: (win_w - game_w * scale) * 0.5,
            y: (win_h - game_h * scale) * 0.5,
            width: game_w * scale,
            height: game_h * scale,
        };

        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(target.texture(), source, dest, Vector2::zero(), 0.0, Color::WHITE);
    }

    fn dimensions(&self) -> (u32, u32) {
        if self.target.is_some() {
            (self.game_width, self.game_height)
        } else {
            (0, 0)
        }
    }

    fn close_requested(&self) -> bool {
        self.rl.window_should_close()
    }

    fn teardown(&mut self) {
        if self.target.take().is_some() {
            log::info!("screen torn down");
        }
        // Subsequent calls find nothing to release; the window itself closes
        // when the Screen is dropped.
    }
}
