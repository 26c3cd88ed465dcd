//! Core types - Geometry shared by the document and components.

// =============================================================================
// Point
// =============================================================================

/// A position in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An element's bounding box in client coordinates.
///
/// The document does not compute layout. The host sets rects on the elements
/// that need them (see [`Document::set_bounding_rect`](crate::dom::Document::set_bounding_rect)).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Length of the longer side.
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Center point of the rect.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check whether a point lies inside the rect (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Format a length as a CSS pixel value (`120px`, `-7.5px`).
pub fn px(value: f64) -> String {
    format!("{value}px")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(120.0), "120px");
        assert_eq!(px(-7.5), "-7.5px");
        assert_eq!(px(0.0), "0px");
    }

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.max_side(), 100.0);
        assert_eq!(rect.center(), Point::new(60.0, 40.0));
        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(!rect.contains(Point::new(111.0, 30.0)));
    }
}
