//! Image descriptors and zoom-aware image data resolution.
//!
//! An image is described by a stable key plus an [`ImageDataProvider`] that
//! may supply hand-tuned data per zoom. When it has nothing for the
//! requested zoom, the 100% data is scaled to fit.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::trace;

use super::registry::{Resource, ScaledResourceRegistry};
use crate::error::{ZoomError, ZoomResult};
use crate::scaling::scaled_image_size;
use crate::zoom::ZoomLevel;

/// Pixel dimensions of one image representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions multiplied by `factor`, rounded to the nearest pixel.
    pub fn scaled(self, factor: f32) -> Self {
        let (width, height) = scaled_image_size(self.width, self.height, factor);
        Self { width, height }
    }
}

/// Supplies image data for a zoom level, or `None` if it has no
/// representation at that zoom.
pub trait ImageDataProvider {
    fn image_data(&self, zoom: ZoomLevel) -> Option<ImageData>;
}

impl<F> ImageDataProvider for F
where
    F: Fn(ZoomLevel) -> Option<ImageData>,
{
    fn image_data(&self, zoom: ZoomLevel) -> Option<ImageData> {
        self(zoom)
    }
}

/// Image data for `zoom`, falling back to the 100% data scaled by
/// `zoom / 100`.
pub fn resolve_image_data(
    key: &str,
    provider: &dyn ImageDataProvider,
    zoom: ZoomLevel,
) -> ZoomResult<ImageData> {
    if let Some(data) = provider.image_data(zoom) {
        return Ok(data);
    }
    if !zoom.is_reference() {
        if let Some(base) = provider.image_data(ZoomLevel::REFERENCE) {
            trace!(key, %zoom, "auto-scaling 100% image data");
            return Ok(base.scaled(zoom.scale_factor()));
        }
    }
    Err(ZoomError::MissingImageData {
        key: key.to_string(),
    })
}

/// Registry key for images. Equality and hashing use `key` only.
#[derive(Clone)]
pub struct ImageDescriptor {
    key: String,
    provider: Rc<dyn ImageDataProvider>,
}

impl ImageDescriptor {
    pub fn new(key: impl Into<String>, provider: Rc<dyn ImageDataProvider>) -> Self {
        Self {
            key: key.into(),
            provider,
        }
    }

    /// Descriptor for a single fixed-size image that exists only at 100%.
    pub fn fixed(key: impl Into<String>, data: ImageData) -> Self {
        let provider = move |zoom: ZoomLevel| zoom.is_reference().then_some(data);
        Self::new(key, Rc::new(provider))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn provider(&self) -> &dyn ImageDataProvider {
        self.provider.as_ref()
    }

    /// Resolve this image's data at `zoom`.
    pub fn data_at(&self, zoom: ZoomLevel) -> ZoomResult<ImageData> {
        resolve_image_data(&self.key, self.provider(), zoom)
    }
}

impl PartialEq for ImageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ImageDescriptor {}

impl Hash for ImageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for ImageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageDescriptor").field(&self.key).finish()
    }
}

pub type ImageRegistry = ScaledResourceRegistry<ImageDescriptor>;

impl ScaledResourceRegistry<ImageDescriptor> {
    /// The image at `zoom`. Fails with [`ZoomError::MissingImageData`] when
    /// the provider has no data at all, before anything is allocated.
    pub fn image(&mut self, descriptor: &ImageDescriptor, zoom: ZoomLevel) -> ZoomResult<Resource> {
        if !self.contains(descriptor, zoom) {
            descriptor.data_at(self.base_zoom())?;
            descriptor.data_at(zoom)?;
        }
        self.get_or_create(descriptor, zoom)
    }
}
