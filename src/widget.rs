//! The widget surface the dispatcher works against.
//!
//! The core does not own widgets. Toolkit code implements [`Widget`] for its
//! own types and exposes whichever zoom-dependent state they carry through
//! the optional slot accessors.

use std::any::Any;

use crate::error::ZoomResult;
use crate::handlers::ClassId;
use crate::resources::{FontDescriptor, FontRegistry, ImageDescriptor, ImageRegistry, Resource};
use crate::scaling::Rect;
use crate::zoom::ZoomLevel;

/// A live UI element that reacts to zoom changes.
pub trait Widget: Any {
    /// Runtime capability class.
    fn class(&self) -> ClassId;

    /// Zoom the widget's cached pixel state was computed for.
    fn zoom(&self) -> ZoomLevel;

    fn set_zoom(&mut self, zoom: ZoomLevel);

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        None
    }

    fn image_slot(&mut self) -> Option<&mut ImageSlot> {
        None
    }

    /// Cached bounds in pixels at [`zoom`](Self::zoom).
    fn bounds(&mut self) -> Option<&mut Rect> {
        None
    }

    /// Visit owned sub-widgets.
    fn for_each_child(&mut self, _visit: &mut dyn FnMut(&mut dyn Widget)) {}

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Widget {
    /// Concrete type of a widget handed to a handler.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A widget's font: what it asked for plus the registry resource currently
/// in use.
#[derive(Debug, Clone, Default)]
pub struct FontSlot {
    /// `None` selects the system font.
    pub descriptor: Option<FontDescriptor>,
    pub resource: Option<Resource>,
}

impl FontSlot {
    pub fn system() -> Self {
        Self::default()
    }

    pub fn custom(descriptor: FontDescriptor) -> Self {
        Self {
            descriptor: Some(descriptor),
            resource: None,
        }
    }

    /// Point the slot at the font for `zoom`. A no-op if it already holds a
    /// live resource at that zoom.
    pub fn refresh(&mut self, fonts: &mut FontRegistry, zoom: ZoomLevel) -> ZoomResult<Resource> {
        if let Some(current) = self.resource.filter(|r| fonts.is_live(*r)) {
            if current.zoom() == zoom {
                return Ok(current);
            }
            let scaled = fonts.scale_for(current, zoom)?;
            self.resource = Some(scaled);
            return Ok(scaled);
        }
        let resource = match &self.descriptor {
            Some(descriptor) => fonts.font(descriptor, zoom)?,
            None => fonts.system_font(zoom)?,
        };
        self.resource = Some(resource);
        Ok(resource)
    }
}

/// A widget's image and the registry resource currently in use.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    pub descriptor: ImageDescriptor,
    pub resource: Option<Resource>,
}

impl ImageSlot {
    pub fn new(descriptor: ImageDescriptor) -> Self {
        Self {
            descriptor,
            resource: None,
        }
    }

    /// Point the slot at the image for `zoom`.
    pub fn refresh(&mut self, images: &mut ImageRegistry, zoom: ZoomLevel) -> ZoomResult<Resource> {
        if let Some(current) = self.resource.filter(|r| images.is_live(*r) && r.zoom() == zoom) {
            return Ok(current);
        }
        let resource = images.image(&self.descriptor, zoom)?;
        self.resource = Some(resource);
        Ok(resource)
    }
}
