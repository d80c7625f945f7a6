//! Character-cell geometry.
//!
//! Coordinates are terminal cells with the origin at the top-left corner.
//! They are `i16` because the generated structs store them as `int16_t`.

use serde::{Deserialize, Serialize};

/// A cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Offsets the point, returning `None` if a coordinate leaves the `i16` range.
    pub fn checked_offset(self, dx: i16, dy: i16) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// A width and height in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i16,
    pub height: i16,
}

impl Size {
    pub fn new(width: i16, height: i16) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are at least one cell.
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// An axis-aligned rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Smallest rectangle covering both corner cells (inclusive).
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        let width = (i32::from(a.x.max(b.x)) - i32::from(min_x) + 1).min(i32::from(i16::MAX));
        let height = (i32::from(a.y.max(b.y)) - i32::from(min_y) + 1).min(i32::from(i16::MAX));
        Self {
            origin: Point::new(min_x, min_y),
            size: Size::new(width as i16, height as i16),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns `true` if the rectangle covers no cells.
    pub fn is_empty(&self) -> bool {
        !self.size.is_positive()
    }

    /// Smallest rectangle containing both. Empty rectangles are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let min_x = i32::from(self.origin.x.min(other.origin.x));
        let min_y = i32::from(self.origin.y.min(other.origin.y));
        let max_x = self.right().max(other.right());
        let max_y = self.bottom().max(other.bottom());
        Rect {
            origin: Point::new(min_x as i16, min_y as i16),
            size: Size::new(
                (max_x - min_x).min(i32::from(i16::MAX)) as i16,
                (max_y - min_y).min(i32::from(i16::MAX)) as i16,
            ),
        }
    }

    /// Exclusive right edge.
    fn right(&self) -> i32 {
        i32::from(self.origin.x) + i32::from(self.size.width)
    }

    /// Exclusive bottom edge.
    fn bottom(&self) -> i32 {
        i32::from(self.origin.y) + i32::from(self.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_is_inclusive() {
        let rect = Rect::from_corners(Point::new(5, 1), Point::new(2, 3));
        assert_eq!(rect.origin(), Point::new(2, 1));
        assert_eq!(rect.size(), Size::new(4, 3));
    }

    #[test]
    fn test_degenerate_corners_cover_one_cell() {
        let rect = Rect::from_corners(Point::new(7, 7), Point::new(7, 7));
        assert_eq!(rect.size(), Size::new(1, 1));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(Point::new(1, 1), Size::new(2, 2));
        let empty = Rect::default();
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(Point::new(0, 0), Size::new(2, 2));
        let b = Rect::new(Point::new(5, 3), Size::new(1, 4));
        let u = a.union(&b);
        assert_eq!(u.origin(), Point::new(0, 0));
        assert_eq!(u.size(), Size::new(6, 7));
    }

    #[test]
    fn test_checked_offset_overflow() {
        assert_eq!(Point::new(i16::MAX, 0).checked_offset(1, 0), None);
        assert_eq!(Point::new(1, 2).checked_offset(-1, 3), Some(Point::new(0, 5)));
    }
}
