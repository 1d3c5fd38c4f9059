//! Integer point and rectangle shapes used by the conversions.

use serde::{Deserialize, Serialize};

/// A 2D integer point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An integer rectangle: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from the top-left and bottom-right corners. The extent
    /// saturates at the `i32` range.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x.saturating_sub(top_left.x),
            height: bottom_right.y.saturating_sub(top_left.y),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Saturates at the `i32` range.
    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_roundtrip() {
        let rect = Rect::new(3, -4, 10, 7);
        assert_eq!(rect.top_left(), Point::new(3, -4));
        assert_eq!(rect.bottom_right(), Point::new(13, 3));
        assert_eq!(Rect::from_corners(rect.top_left(), rect.bottom_right()), rect);
    }

    #[test]
    fn test_corners_saturate_at_range_limits() {
        let rect = Rect::new(i32::MAX - 5, i32::MIN, 10, -10);
        assert_eq!(rect.bottom_right(), Point::new(i32::MAX, i32::MIN));
        let wide = Rect::from_corners(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        assert_eq!(wide.width, i32::MAX);
    }
}
