//! Texture registry and the opaque image handle.
//!
//! Textures live on the GPU and belong to the [`TextureStore`]; everything
//! else in the engine refers to them through a cheap [`ImageHandle`] that
//! carries the store key and the pixel dimensions. Handles can be built
//! without a GPU texture at all, which keeps the animation and sprite code
//! testable off-screen. The engine never inspects image contents.

use std::sync::Arc;

use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

/// Opaque reference to a texture held by a [`TextureStore`].
///
/// Cloning is cheap (the key is an `Arc<str>`); clones refer to the same
/// immutable texture. The recorded dimensions are what sprites report as
/// their width/height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    key: Arc<str>,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Build a handle from a key and pixel dimensions.
    ///
    /// Usually obtained from [`TextureStore::insert`]; direct construction is
    /// for callers (and tests) that manage texture resolution themselves.
    pub fn new(key: impl Into<Arc<str>>, width: u32, height: u32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }

    /// Store key this handle resolves through.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Width of the referenced image in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the referenced image in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Loaded textures keyed by string IDs.
#[derive(Default)]
pub struct TextureStore {
    map: FxHashMap<Arc<str>, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Store a texture under `key` and return the handle describing it.
    ///
    /// Inserting under an existing key replaces the texture; outstanding
    /// handles keep resolving to the new one.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, texture: Texture2D) -> ImageHandle {
        let key: Arc<str> = key.into();
        let handle = ImageHandle {
            key: Arc::clone(&key),
            width: texture.width as u32,
            height: texture.height as u32,
        };
        self.map.insert(key, texture);
        handle
    }

    /// Resolve a key to its texture, if loaded.
    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
