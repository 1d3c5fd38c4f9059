//! Conversion between device-independent points and device pixels.
//!
//! `to_pixels` multiplies by `zoom / 100`, `to_points` divides by it; both
//! round to the nearest integer with ties away from zero. At 100% every
//! conversion is the identity, so values that never leave the reference zoom
//! never accumulate rounding error.
//!
//! Scalar conversions pass [`UNSET`] through unchanged. Points, rectangles
//! and slices do not: `-1` is a legal coordinate.
//!
//! Rectangles are converted corner by corner, and the extent is the
//! difference of the converted corners. Scaling width and height on their own
//! would let the right edge drift one pixel away from the next rectangle's
//! left edge.

pub mod geometry;

pub use geometry::{Point, Rect};

use crate::zoom::constants::{REFERENCE_ZOOM, UNSET};
use crate::zoom::ZoomLevel;

/// Shapes that can be converted between points and pixels.
pub trait Scale: Copy {
    /// Points to pixels at `zoom`.
    fn to_pixels(self, zoom: ZoomLevel) -> Self;

    /// Pixels at `zoom` to points.
    fn to_points(self, zoom: ZoomLevel) -> Self;

    /// Pixels at `from` to pixels at `to`, going through points so that
    /// repeated rescaling does not compound rounding.
    fn rescale(self, from: ZoomLevel, to: ZoomLevel) -> Self {
        if from == to {
            return self;
        }
        self.to_points(from).to_pixels(to)
    }
}

fn factor(zoom: ZoomLevel) -> f64 {
    f64::from(zoom.percent()) / f64::from(REFERENCE_ZOOM)
}

fn round_mul(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).round() as i32
}

fn round_div(value: i32, factor: f64) -> i32 {
    (f64::from(value) / factor).round() as i32
}

impl Scale for i32 {
    fn to_pixels(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() || self == UNSET {
            return self;
        }
        round_mul(self, factor(zoom))
    }

    fn to_points(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() || self == UNSET {
            return self;
        }
        round_div(self, factor(zoom))
    }
}

impl Scale for f32 {
    fn to_pixels(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() || self == UNSET as f32 {
            return self;
        }
        self * zoom.scale_factor()
    }

    fn to_points(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() || self == UNSET as f32 {
            return self;
        }
        self / zoom.scale_factor()
    }
}

impl Scale for Point {
    fn to_pixels(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() {
            return self;
        }
        let f = factor(zoom);
        Point::new(round_mul(self.x, f), round_mul(self.y, f))
    }

    fn to_points(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() {
            return self;
        }
        let f = factor(zoom);
        Point::new(round_div(self.x, f), round_div(self.y, f))
    }
}

impl Scale for Rect {
    fn to_pixels(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() {
            return self;
        }
        let f = factor(zoom);
        convert_corners(self, |v| v * f)
    }

    fn to_points(self, zoom: ZoomLevel) -> Self {
        if zoom.is_reference() {
            return self;
        }
        let f = factor(zoom);
        convert_corners(self, |v| v / f)
    }
}

/// Convert both corners in `f64` and narrow at the end. Corners and extent
/// saturate at the `i32` range instead of overflowing.
fn convert_corners(rect: Rect, convert: impl Fn(f64) -> f64) -> Rect {
    let x0 = f64::from(rect.x);
    let y0 = f64::from(rect.y);
    let left = convert(x0).round();
    let top = convert(y0).round();
    let right = convert(x0 + f64::from(rect.width)).round();
    let bottom = convert(y0 + f64::from(rect.height)).round();
    Rect::new(
        left as i32,
        top as i32,
        (right - left) as i32,
        (bottom - top) as i32,
    )
}

/// Element of a coordinate array. Unlike [`Scale`], every value converts,
/// `-1` included.
pub trait Coordinate: Copy {
    fn mul_factor(self, factor: f64) -> Self;
    fn div_factor(self, factor: f64) -> Self;
}

impl Coordinate for i32 {
    fn mul_factor(self, factor: f64) -> Self {
        round_mul(self, factor)
    }

    fn div_factor(self, factor: f64) -> Self {
        round_div(self, factor)
    }
}

impl Coordinate for f32 {
    fn mul_factor(self, factor: f64) -> Self {
        (f64::from(self) * factor) as f32
    }

    fn div_factor(self, factor: f64) -> Self {
        (f64::from(self) / factor) as f32
    }
}

/// Convert a coordinate array (e.g. a polyline or dash pattern) from points
/// to pixels.
pub fn to_pixels_all<T: Coordinate>(values: &[T], zoom: ZoomLevel) -> Vec<T> {
    if zoom.is_reference() {
        return values.to_vec();
    }
    let f = factor(zoom);
    values.iter().map(|&v| v.mul_factor(f)).collect()
}

/// Convert a coordinate array from pixels to points.
pub fn to_points_all<T: Coordinate>(values: &[T], zoom: ZoomLevel) -> Vec<T> {
    if zoom.is_reference() {
        return values.to_vec();
    }
    let f = factor(zoom);
    values.iter().map(|&v| v.div_factor(f)).collect()
}

/// Convert a value expressed at `from` zoom to `to` zoom:
/// `round(value * to / from)`.
pub fn scale_value(value: i32, from: ZoomLevel, to: ZoomLevel) -> i32 {
    if from == to || value == UNSET {
        return value;
    }
    round_mul(value, f64::from(to.percent()) / f64::from(from.percent()))
}

/// Inverse of [`scale_value`]: bring a value expressed at `to` zoom back to
/// `from` zoom.
pub fn unscale_value(value: i32, from: ZoomLevel, to: ZoomLevel) -> i32 {
    scale_value(value, to, from)
}

/// Scale image dimensions by `factor`, rounding each to the nearest pixel.
pub fn scaled_image_size(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let w = (width as f32 * factor).round().max(0.0) as u32;
    let h = (height as f32 * factor).round().max(0.0) as u32;
    (w, h)
}
