//! Zoom-change events and the platform notification queue.
//!
//! # Flow
//!
//! ```text
//! ┌──────────────────┐  post()   ┌───────────────────┐
//! │  windowing glue  │ ────────▶ │ NotificationQueue │
//! │  (any thread)    │           │  (mpsc channel)   │
//! └──────────────────┘           └─────────┬─────────┘
//!                                          │ drain()
//!                                          ▼
//! ┌──────────────────────────────────────────────────┐
//! │ Display::process_notifications() (UI thread)     │
//! │   updates DeviceZoom, yields ZoomChangeEvents    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! - [`types`]: `ZoomChangeEvent`, `DpiNotification`
//! - [`bus`]: `NotificationQueue` and `NotificationSender`

pub mod bus;
pub mod types;

pub use bus::{NotificationQueue, NotificationSender};
pub use types::{DpiNotification, ZoomChangeEvent};
