//! Per-zoom native resource caches.
//!
//! - [`backend`]: `ResourceFactory` contract and `NativeHandle`
//! - [`registry`]: the generic `(key, zoom)` cache
//! - [`font`]: font descriptors, system font
//! - [`image`]: image descriptors and data providers

pub mod backend;
pub mod font;
pub mod image;
pub mod registry;

pub use backend::{NativeHandle, ResourceFactory};
pub use font::{FontDescriptor, FontKey, FontRegistry, FontStyle};
pub use image::{ImageData, ImageDataProvider, ImageDescriptor, ImageRegistry};
pub use registry::{Resource, ScaledResourceRegistry};

use crate::zoom::ZoomLevel;

/// The font and image registries of one session.
pub struct Resources {
    pub fonts: FontRegistry,
    pub images: ImageRegistry,
}

impl Resources {
    /// Registries whose base resources are created at `base_zoom`.
    pub fn new(
        fonts: Box<dyn ResourceFactory<FontKey>>,
        images: Box<dyn ResourceFactory<ImageDescriptor>>,
        base_zoom: ZoomLevel,
    ) -> Self {
        Self {
            fonts: FontRegistry::new(fonts, base_zoom),
            images: ImageRegistry::new(images, base_zoom),
        }
    }

    /// Release everything both registries own.
    pub fn dispose_all(&mut self) {
        self.fonts.dispose_all();
        self.images.dispose_all();
    }

    pub fn len(&self) -> usize {
        self.fonts.len() + self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty() && self.images.is_empty()
    }
}
