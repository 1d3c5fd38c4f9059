//! AppKit zoom source: physical zoom from a screen's backing scale factor.
//!
//! A [`MonitorId`] indexes `NSScreen.screens`; the primary id maps to
//! `NSScreen.mainScreen`. Queries off the main thread report no zoom.

use objc2::MainThreadMarker;
use objc2_app_kit::NSScreen;

use crate::zoom::constants::REFERENCE_ZOOM;
use crate::zoom::{MonitorId, ZoomSource};

#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenZoomSource;

impl ZoomSource for ScreenZoomSource {
    fn physical_zoom(&self, monitor: MonitorId) -> i32 {
        let Some(mtm) = MainThreadMarker::new() else {
            return 0;
        };
        let screen = if monitor == MonitorId::PRIMARY {
            NSScreen::mainScreen(mtm)
        } else {
            NSScreen::screens(mtm).iter().nth(monitor.0)
        };
        screen
            .map(|s| (s.backingScaleFactor() * f64::from(REFERENCE_ZOOM)).round() as i32)
            .unwrap_or(0)
    }
}
