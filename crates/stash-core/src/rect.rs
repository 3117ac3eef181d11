use serde::{Deserialize, Serialize};

/// A point in global screen coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle representing a window's position and size.
///
/// Coordinates follow the window server's convention: the origin is the
/// top-left corner of the main display and Y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Leading (left) edge.
    pub fn min_x(&self) -> f64 {
        self.x
    }

    /// Trailing (right) edge.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge.
    pub fn min_y(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center of the rectangle.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center of the rectangle.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Returns whether the point lies inside the rectangle.
    ///
    /// The leading and top edges are inclusive, the trailing and bottom
    /// edges exclusive, so adjacent displays never both claim a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Returns whether both rectangles span exactly the same rows.
    pub fn same_vertical_extent(&self, other: &Rect) -> bool {
        self.min_y() == other.min_y() && self.max_y() == other.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_center() {
        let rect = Rect::new(100.0, 0.0, 40.0, 24.0);

        assert_eq!(rect.min_x(), 100.0);
        assert_eq!(rect.max_x(), 140.0);
        assert_eq!(rect.mid_x(), 120.0);
        assert_eq!(rect.center(), Point::new(120.0, 12.0));
    }

    #[test]
    fn contains_excludes_trailing_edges() {
        let screen = Rect::new(0.0, 0.0, 1440.0, 900.0);

        assert!(screen.contains(Point::new(0.0, 0.0)));
        assert!(screen.contains(Point::new(1439.5, 899.0)));
        assert!(!screen.contains(Point::new(1440.0, 10.0)));
        assert!(!screen.contains(Point::new(-1.0, 10.0)));
    }

    #[test]
    fn vertical_extent_requires_exact_match() {
        let menu_bar = Rect::new(0.0, 0.0, 1440.0, 24.0);

        assert!(Rect::new(300.0, 0.0, 30.0, 24.0).same_vertical_extent(&menu_bar));
        assert!(!Rect::new(300.0, 0.0, 30.0, 22.0).same_vertical_extent(&menu_bar));
        assert!(!Rect::new(300.0, 40.0, 30.0, 24.0).same_vertical_extent(&menu_bar));
    }
}
