//! Font descriptors and the font flavour of the registry.

use std::fmt;

use super::registry::{Resource, ScaledResourceRegistry};
use crate::error::ZoomResult;
use crate::zoom::constants::{POINTS_PER_INCH, REFERENCE_DPI, REFERENCE_ZOOM};
use crate::zoom::ZoomLevel;

/// Font weight/slant flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
    };
}

/// Zoom-independent font description. Height is in points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub family: String,
    pub height: u32,
    pub style: FontStyle,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, height: u32, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            height,
            style,
        }
    }

    /// Native pixel height at `zoom`: `round(points * 96 / 72 * zoom / 100)`.
    pub fn pixel_height(&self, zoom: ZoomLevel) -> i32 {
        pixel_height(self.height, zoom)
    }

    /// Same family and style, height multiplied by `factor` (at least 1pt).
    pub fn scaled(&self, factor: f32) -> Self {
        let height = (self.height as f32 * factor).round().max(1.0) as u32;
        Self {
            family: self.family.clone(),
            height,
            style: self.style,
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt", self.family, self.height)?;
        if self.style.bold {
            f.write_str(" bold")?;
        }
        if self.style.italic {
            f.write_str(" italic")?;
        }
        Ok(())
    }
}

/// Pixel height of a `points`-sized font at `zoom`.
pub fn pixel_height(points: u32, zoom: ZoomLevel) -> i32 {
    let px = f64::from(points) * f64::from(REFERENCE_DPI) / f64::from(POINTS_PER_INCH)
        * f64::from(zoom.percent())
        / f64::from(REFERENCE_ZOOM);
    px.round() as i32
}

/// Registry key for fonts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontKey {
    /// The platform's default UI font, sized from system metrics.
    System,
    /// An application font.
    Custom(FontDescriptor),
}

impl From<FontDescriptor> for FontKey {
    fn from(descriptor: FontDescriptor) -> Self {
        Self::Custom(descriptor)
    }
}

pub type FontRegistry = ScaledResourceRegistry<FontKey>;

impl ScaledResourceRegistry<FontKey> {
    /// The system font at `zoom`. Its base is created on first use at the
    /// registry's base zoom.
    pub fn system_font(&mut self, zoom: ZoomLevel) -> ZoomResult<Resource> {
        self.get_or_create(&FontKey::System, zoom)
    }

    /// An application font at `zoom`.
    pub fn font(&mut self, descriptor: &FontDescriptor, zoom: ZoomLevel) -> ZoomResult<Resource> {
        self.get_or_create(&FontKey::Custom(descriptor.clone()), zoom)
    }
}
