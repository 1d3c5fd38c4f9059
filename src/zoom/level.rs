//! The zoom level value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{REFERENCE_DPI, REFERENCE_ZOOM};
use crate::error::{ZoomError, ZoomResult};

/// Display scaling as an integer percentage of the 96 DPI reference.
///
/// Always greater than zero. The only way to build one is through
/// [`ZoomLevel::new`] (or the DPI mapping), so code that takes a `ZoomLevel`
/// never has to re-check for a non-positive zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ZoomLevel(i32);

impl ZoomLevel {
    /// 100%, the unscaled reference.
    pub const REFERENCE: ZoomLevel = ZoomLevel(REFERENCE_ZOOM);

    /// Validate a percentage. Zero or negative is rejected.
    pub fn new(percent: i32) -> ZoomResult<Self> {
        if percent > 0 {
            Ok(Self(percent))
        } else {
            Err(ZoomError::InvalidZoom(percent.into()))
        }
    }

    /// Map a DPI value to a zoom level: `round(dpi * 100 / 96)`.
    pub fn from_dpi(dpi: u32) -> ZoomResult<Self> {
        let zoom = (f64::from(dpi) * f64::from(REFERENCE_ZOOM) / f64::from(REFERENCE_DPI)).round();
        Self::new(zoom as i32)
    }

    /// Map back to a DPI value: `round(zoom * 96 / 100)`.
    pub fn to_dpi(self) -> u32 {
        (f64::from(self.0) * f64::from(REFERENCE_DPI) / f64::from(REFERENCE_ZOOM)).round() as u32
    }

    /// The raw percentage.
    pub fn percent(self) -> i32 {
        self.0
    }

    /// Linear scale factor relative to 100% (`zoom / 100`).
    pub fn scale_factor(self) -> f32 {
        self.0 as f32 / REFERENCE_ZOOM as f32
    }

    /// True for the 100% reference zoom.
    pub fn is_reference(self) -> bool {
        self.0 == REFERENCE_ZOOM
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl TryFrom<i32> for ZoomLevel {
    type Error = ZoomError;

    fn try_from(percent: i32) -> ZoomResult<Self> {
        Self::new(percent)
    }
}

impl From<ZoomLevel> for i32 {
    fn from(zoom: ZoomLevel) -> i32 {
        zoom.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
