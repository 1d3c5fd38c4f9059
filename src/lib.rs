//! DPI/zoom rescaling core for native widget toolkits.
//!
//! Pure Rust except for the cfg-gated backends under [`platform`], so the
//! whole core runs as ordinary unit and integration tests.
//!
//! # Layers
//!
//! ```text
//! platform notification ─▶ Display ─▶ DeviceZoom ─▶ ZoomChangeEvent
//!                                         │
//!                                         ▼
//!                               ZoomChangeDispatcher
//!                                 (handlers by class)
//!                                         │
//!                        ┌────────────────┴────────────────┐
//!                        ▼                                 ▼
//!              ScaledResourceRegistry              scaling (points ⇄ pixels)
//!               (fonts, images per zoom)
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod handlers;
pub mod platform;
pub mod resources;
pub mod scaling;
pub mod widget;
pub mod zoom;

pub use config::{AutoScale, ScalingConfig};
pub use display::{Display, Platform};
pub use error::{ZoomError, ZoomResult};
pub use events::ZoomChangeEvent;
pub use handlers::{ClassId, DispatchReport, ZoomChangeDispatcher};
pub use resources::{Resource, ScaledResourceRegistry};
pub use scaling::{scale_value, unscale_value, Point, Rect, Scale};
pub use widget::Widget;
pub use zoom::{DeviceZoom, ZoomLevel};
