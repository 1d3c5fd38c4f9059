//! Zoom-change values.
//!
//! Pure Rust with no FFI dependencies, fully testable.

use std::fmt;

use crate::zoom::{MonitorId, ZoomLevel};

/// An old -> new zoom transition.
///
/// Both zooms are validated [`ZoomLevel`]s, so the scale factor never
/// divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoomChangeEvent {
    old_zoom: ZoomLevel,
    new_zoom: ZoomLevel,
}

impl ZoomChangeEvent {
    pub fn new(old_zoom: ZoomLevel, new_zoom: ZoomLevel) -> Self {
        Self { old_zoom, new_zoom }
    }

    pub fn old_zoom(&self) -> ZoomLevel {
        self.old_zoom
    }

    pub fn new_zoom(&self) -> ZoomLevel {
        self.new_zoom
    }

    /// `new_zoom / old_zoom`.
    pub fn scale_factor(&self) -> f32 {
        self.new_zoom.percent() as f32 / self.old_zoom.percent() as f32
    }

    /// True when the zoom actually changes.
    pub fn is_change(&self) -> bool {
        self.old_zoom != self.new_zoom
    }
}

impl fmt::Display for ZoomChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[oldZoom={}, newZoom={}]", self.old_zoom, self.new_zoom)
    }
}

/// A DPI report from the windowing glue, posted from whatever thread
/// received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiNotification {
    /// Monitor whose density changed.
    pub monitor: MonitorId,
    /// New physical DPI of that monitor.
    pub dpi: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(p: i32) -> ZoomLevel {
        ZoomLevel::new(p).unwrap()
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(ZoomChangeEvent::new(zoom(100), zoom(200)).scale_factor(), 2.0);
        assert_eq!(ZoomChangeEvent::new(zoom(200), zoom(100)).scale_factor(), 0.5);
        assert_eq!(ZoomChangeEvent::new(zoom(100), zoom(150)).scale_factor(), 1.5);
    }

    #[test]
    fn test_is_change() {
        assert!(ZoomChangeEvent::new(zoom(100), zoom(125)).is_change());
        assert!(!ZoomChangeEvent::new(zoom(125), zoom(125)).is_change());
    }

    #[test]
    fn test_event_display() {
        let event = ZoomChangeEvent::new(zoom(100), zoom(200));
        assert_eq!(event.to_string(), "[oldZoom=100%, newZoom=200%]");
    }
}
