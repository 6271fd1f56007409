//! Integer geometry primitives shared by the layout engines.

use crate::units::Micro;
use serde::{Deserialize, Serialize};

/// A position in the layout plane. `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Micro,
    pub y: Micro,
}

impl Point {
    pub const ORIGIN: Point = Point {
        x: Micro::ZERO,
        y: Micro::ZERO,
    };

    pub const fn new(x: Micro, y: Micro) -> Self {
        Self { x, y }
    }

    /// Point from whole display millimetres.
    pub const fn from_mm(x: i64, y: i64) -> Self {
        Self::new(Micro::from_mm(x), Micro::from_mm(y))
    }

    pub fn translated(self, dx: Micro, dy: Micro) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared euclidean distance in micro-units².
    pub fn distance_squared(self, other: Point) -> i128 {
        let dx = (self.x - other.x).raw() as i128;
        let dy = (self.y - other.y).raw() as i128;
        dx * dx + dy * dy
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: Micro,
    pub height: Micro,
}

impl Dimension {
    pub const fn new(width: Micro, height: Micro) -> Self {
        Self { width, height }
    }

    pub const fn from_mm(width: i64, height: i64) -> Self {
        Self::new(Micro::from_mm(width), Micro::from_mm(height))
    }

    /// Area in micro-units².
    pub fn area(self) -> i128 {
        self.width.raw() as i128 * self.height.raw() as i128
    }

    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn is_square(self) -> bool {
        self.width == self.height
    }

    /// The smaller of the two sides.
    pub fn min_side(self) -> Micro {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Dimension,
}

impl Rect {
    pub const fn new(origin: Point, size: Dimension) -> Self {
        Self { origin, size }
    }

    pub fn from_xywh(x: Micro, y: Micro, width: Micro, height: Micro) -> Self {
        Self::new(Point::new(x, y), Dimension::new(width, height))
    }

    pub fn left(&self) -> Micro {
        self.origin.x
    }

    pub fn top(&self) -> Micro {
        self.origin.y
    }

    pub fn right(&self) -> Micro {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> Micro {
        self.origin.y + self.size.height
    }

    pub fn area(&self) -> i128 {
        self.size.area()
    }

    /// Centre point, floored to whole micro-units.
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width.half(),
            self.origin.y + self.size.height.half(),
        )
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// Inclusive on the top/left edges, exclusive on the bottom/right edges.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Overlapping region, or `None` when the rectangles only touch or are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::from_xywh(left, top, right - left, bottom - top))
    }

    pub fn translated(&self, dx: Micro, dy: Micro) -> Rect {
        Rect::new(self.origin.translated(dx, dy), self.size)
    }
}
