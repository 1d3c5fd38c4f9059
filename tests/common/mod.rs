//! Shared fixtures: sample widgets and a headless session.
#![allow(dead_code)]

use std::any::Any;

use zoomscale::config::{AutoScale, ScalingConfig};
use zoomscale::handlers::ClassId;
use zoomscale::platform::HeadlessBackend;
use zoomscale::resources::{FontDescriptor, FontStyle, ImageData, ImageDescriptor};
use zoomscale::scaling::Rect;
use zoomscale::widget::{FontSlot, ImageSlot, Widget};
use zoomscale::{Display, ZoomLevel};

pub fn zoom(percent: i32) -> ZoomLevel {
    ZoomLevel::new(percent).expect("positive zoom")
}

pub fn exact_config() -> ScalingConfig {
    ScalingConfig {
        auto_scale: AutoScale::Exact,
        auto_scale_on_runtime: true,
    }
}

/// A session on a headless backend whose primary monitor is at
/// `physical` zoom, using the exact auto-scale policy.
pub fn session(physical: i32) -> (Display, HeadlessBackend) {
    session_with(physical, exact_config())
}

pub fn session_with(physical: i32, config: ScalingConfig) -> (Display, HeadlessBackend) {
    let backend = HeadlessBackend::new(physical);
    let display = Display::new(config, backend.platform());
    (display, backend)
}

pub fn body_font() -> FontDescriptor {
    FontDescriptor::new("Segoe UI", 12, FontStyle::NORMAL)
}

pub fn icon() -> ImageDescriptor {
    ImageDescriptor::fixed("icon", ImageData::new(16, 16))
}

/// A plain control with a font and bounds.
pub struct Button {
    pub zoom: ZoomLevel,
    pub font: FontSlot,
    pub bounds: Rect,
}

impl Button {
    pub fn new(zoom: ZoomLevel, font: FontDescriptor) -> Self {
        Self {
            zoom,
            font: FontSlot::custom(font),
            bounds: Rect::new(10, 10, 80, 24),
        }
    }
}

impl Widget for Button {
    fn class(&self) -> ClassId {
        ClassId::CONTROL
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        Some(&mut self.font)
    }

    fn bounds(&mut self) -> Option<&mut Rect> {
        Some(&mut self.bounds)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An item of a tab folder, of a class defined below `item`.
pub struct TabItem {
    pub class: ClassId,
    pub zoom: ZoomLevel,
    pub image: ImageSlot,
    pub font: FontSlot,
}

impl TabItem {
    pub fn new(class: ClassId, zoom: ZoomLevel) -> Self {
        Self {
            class,
            zoom,
            image: ImageSlot::new(icon()),
            font: FontSlot::system(),
        }
    }
}

impl Widget for TabItem {
    fn class(&self) -> ClassId {
        self.class
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        Some(&mut self.font)
    }

    fn image_slot(&mut self) -> Option<&mut ImageSlot> {
        Some(&mut self.image)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A composite owning tab items.
pub struct TabFolder {
    pub zoom: ZoomLevel,
    pub font: FontSlot,
    pub bounds: Rect,
    pub items: Vec<TabItem>,
}

impl Widget for TabFolder {
    fn class(&self) -> ClassId {
        ClassId::COMPOSITE
    }

    fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    fn font_slot(&mut self) -> Option<&mut FontSlot> {
        Some(&mut self.font)
    }

    fn bounds(&mut self) -> Option<&mut Rect> {
        Some(&mut self.bounds)
    }

    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut dyn Widget)) {
        for item in &mut self.items {
            visit(item);
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
