//! Zoom model.
//!
//! This module contains the zoom level value type, the device-zoom state of
//! a display session and the reference constants used for conversion.
//! Pure Rust, no FFI.

pub mod constants;
pub mod device;
pub mod level;

pub use device::{DeviceZoom, MonitorId, ZoomSource};
pub use level::ZoomLevel;
