//! Native collaborators.
//!
//! Each backend implements some of [`ResourceFactory`](crate::resources::ResourceFactory)
//! and [`ZoomSource`](crate::zoom::ZoomSource):
//! - `headless`: synthetic handles, any platform
//! - `windows`: GDI fonts and bitmaps, per-monitor DPI
//! - `macos`: screen backing scale factor

pub mod headless;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

pub use headless::HeadlessBackend;
