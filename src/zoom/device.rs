//! Device-zoom state: the native (physical) zoom and the device zoom derived
//! from it by the auto-scale policy.
//!
//! A [`DeviceZoom`] lives inside the [`Display`](crate::Display) session and
//! is the single point of truth for "what zoom are we at". Consumers read it
//! per operation through the accessors and never keep a copy around.

use tracing::debug;

use super::ZoomLevel;
use crate::config::AutoScale;
use crate::events::ZoomChangeEvent;

/// Opaque monitor identifier handed out by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub usize);

impl MonitorId {
    /// The primary monitor.
    pub const PRIMARY: MonitorId = MonitorId(0);
}

/// Source of physical zoom values, provided by the native layer.
pub trait ZoomSource {
    /// Current physical zoom percentage of `monitor`. A value of zero or less
    /// means the platform could not tell.
    fn physical_zoom(&self, monitor: MonitorId) -> i32;
}

/// Current and native zoom of one display session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceZoom {
    native: ZoomLevel,
    device: ZoomLevel,
    auto_scale: AutoScale,
}

impl DeviceZoom {
    /// Initial state for a primary monitor at `native` zoom.
    pub fn new(native: ZoomLevel, auto_scale: AutoScale) -> Self {
        Self {
            native,
            device: auto_scale.device_zoom_for(native),
            auto_scale,
        }
    }

    /// Zoom reflecting the actual monitor density, independent of any
    /// override.
    pub fn native_zoom(&self) -> ZoomLevel {
        self.native
    }

    /// Zoom that scaling operations use.
    pub fn device_zoom(&self) -> ZoomLevel {
        self.device
    }

    /// Policy used to derive the device zoom.
    pub fn auto_scale(&self) -> AutoScale {
        self.auto_scale
    }

    /// Explicitly set the device zoom. Returns the transition if it changed.
    pub fn set_device_zoom(&mut self, zoom: ZoomLevel) -> Option<ZoomChangeEvent> {
        let event = ZoomChangeEvent::new(self.device, zoom);
        if !event.is_change() {
            return None;
        }
        debug!(%event, "device zoom set");
        self.device = zoom;
        Some(event)
    }

    /// Record a new physical zoom and re-derive the device zoom from it.
    /// Returns the device-zoom transition if it changed.
    pub fn set_native_zoom(&mut self, native: ZoomLevel) -> Option<ZoomChangeEvent> {
        if native != self.native {
            debug!(old = %self.native, new = %native, "native zoom changed");
            self.native = native;
        }
        self.set_device_zoom(self.auto_scale.device_zoom_for(native))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(p: i32) -> ZoomLevel {
        ZoomLevel::new(p).unwrap()
    }

    #[test]
    fn test_device_zoom_follows_policy() {
        let state = DeviceZoom::new(zoom(150), AutoScale::Exact);
        assert_eq!(state.native_zoom(), zoom(150));
        assert_eq!(state.device_zoom(), zoom(150));

        let state = DeviceZoom::new(zoom(150), AutoScale::Integer);
        assert_eq!(state.native_zoom(), zoom(150));
        assert_eq!(state.device_zoom(), zoom(100));
    }

    #[test]
    fn test_set_device_zoom_reports_transition() {
        let mut state = DeviceZoom::new(zoom(100), AutoScale::Exact);
        let event = state.set_device_zoom(zoom(200)).expect("zoom changed");
        assert_eq!(event.old_zoom(), zoom(100));
        assert_eq!(event.new_zoom(), zoom(200));
        assert_eq!(state.device_zoom(), zoom(200));
        // native zoom is untouched by an override
        assert_eq!(state.native_zoom(), zoom(100));
        assert!(state.set_device_zoom(zoom(200)).is_none());
    }

    #[test]
    fn test_native_change_rederives_device_zoom() {
        let mut state = DeviceZoom::new(zoom(100), AutoScale::Integer);
        // 125% rounds down to 100%: native moves, device does not
        assert!(state.set_native_zoom(zoom(125)).is_none());
        assert_eq!(state.native_zoom(), zoom(125));

        let event = state.set_native_zoom(zoom(200)).expect("device zoom changed");
        assert_eq!(event.new_zoom(), zoom(200));
    }
}
