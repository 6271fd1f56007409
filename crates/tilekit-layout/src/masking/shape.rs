//! Mask shapes and their geometry.

use crate::grid::TileId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use tilekit_core::{Dimension, LayoutError, Micro, Point, Rect};

/// User-assigned mask identity, unique among active masks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskId(String);

impl MaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Region covered by a mask, in the grid's coordinate space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaskGeometry {
    Rectangle {
        x: Micro,
        y: Micro,
        width: Micro,
        height: Micro,
    },
    Circle {
        cx: Micro,
        cy: Micro,
        radius: Micro,
    },
    Polygon {
        points: Vec<Point>,
    },
}

impl MaskGeometry {
    pub fn rectangle(rect: Rect) -> Self {
        MaskGeometry::Rectangle {
            x: rect.left(),
            y: rect.top(),
            width: rect.size.width,
            height: rect.size.height,
        }
    }

    pub fn circle(center: Point, radius: Micro) -> Self {
        MaskGeometry::Circle {
            cx: center.x,
            cy: center.y,
            radius,
        }
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        MaskGeometry::Polygon { points }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MaskGeometry::Rectangle { .. } => "rectangle",
            MaskGeometry::Circle { .. } => "circle",
            MaskGeometry::Polygon { .. } => "polygon",
        }
    }

    /// Rejects geometry that cannot cover anything.
    pub fn validate(&self, id: &MaskId) -> Result<(), LayoutError> {
        let invalid = |reason: &str| LayoutError::InvalidMaskGeometry {
            id: id.to_string(),
            reason: reason.to_string(),
        };
        match self {
            MaskGeometry::Rectangle { width, height, .. } => {
                if *width <= Micro::ZERO || *height <= Micro::ZERO {
                    return Err(invalid("rectangle width and height must be positive"));
                }
            }
            MaskGeometry::Circle { radius, .. } => {
                if *radius <= Micro::ZERO {
                    return Err(invalid("circle radius must be positive"));
                }
            }
            MaskGeometry::Polygon { points } => {
                if points.len() < 3 {
                    return Err(invalid("polygon needs at least three vertices"));
                }
                let bounds = self.bounds();
                if bounds.size.width.is_zero() || bounds.size.height.is_zero() {
                    return Err(invalid("polygon encloses no area"));
                }
            }
        }
        Ok(())
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match self {
            MaskGeometry::Rectangle {
                x,
                y,
                width,
                height,
            } => Rect::from_xywh(*x, *y, *width, *height),
            MaskGeometry::Circle { cx, cy, radius } => {
                Rect::from_xywh(*cx - *radius, *cy - *radius, radius.times(2), radius.times(2))
            }
            MaskGeometry::Polygon { points } => {
                let Some(first) = points.first() else {
                    return Rect::from_xywh(Micro::ZERO, Micro::ZERO, Micro::ZERO, Micro::ZERO);
                };
                let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
                for p in &points[1..] {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }

    /// Reference point used by `move_shape`: rectangle top-left, circle
    /// centre, polygon bounding-box top-left.
    pub fn anchor(&self) -> Point {
        match self {
            MaskGeometry::Rectangle { x, y, .. } => Point::new(*x, *y),
            MaskGeometry::Circle { cx, cy, .. } => Point::new(*cx, *cy),
            MaskGeometry::Polygon { .. } => self.bounds().origin,
        }
    }

    pub fn translated(&self, dx: Micro, dy: Micro) -> Self {
        match self {
            MaskGeometry::Rectangle {
                x,
                y,
                width,
                height,
            } => MaskGeometry::Rectangle {
                x: *x + dx,
                y: *y + dy,
                width: *width,
                height: *height,
            },
            MaskGeometry::Circle { cx, cy, radius } => MaskGeometry::Circle {
                cx: *cx + dx,
                cy: *cy + dy,
                radius: *radius,
            },
            MaskGeometry::Polygon { points } => MaskGeometry::Polygon {
                points: points.iter().map(|p| p.translated(dx, dy)).collect(),
            },
        }
    }

    /// Same shape with its anchor at `position`.
    pub fn moved_to(&self, position: Point) -> Self {
        let anchor = self.anchor();
        self.translated(position.x - anchor.x, position.y - anchor.y)
    }

    /// Fits the shape to `size`, keeping its anchor corner.
    ///
    /// Circles take the radius `min(width, height) / 2` and keep their centre.
    /// Polygons are scaled about their bounding-box origin.
    pub fn resized(&self, size: Dimension) -> Self {
        match self {
            MaskGeometry::Rectangle { x, y, .. } => MaskGeometry::Rectangle {
                x: *x,
                y: *y,
                width: size.width,
                height: size.height,
            },
            MaskGeometry::Circle { cx, cy, .. } => MaskGeometry::Circle {
                cx: *cx,
                cy: *cy,
                radius: size.min_side().half(),
            },
            MaskGeometry::Polygon { points } => {
                let bounds = self.bounds();
                let origin = bounds.origin;
                let scale = |v: Micro, base: Micro, from: Micro, to: Micro| {
                    if from.is_zero() {
                        return base;
                    }
                    let offset = (v - base).raw() as i128 * to.raw() as i128 / from.raw() as i128;
                    base + Micro::new(offset as i64)
                };
                MaskGeometry::Polygon {
                    points: points
                        .iter()
                        .map(|p| {
                            Point::new(
                                scale(p.x, origin.x, bounds.size.width, size.width),
                                scale(p.y, origin.y, bounds.size.height, size.height),
                            )
                        })
                        .collect(),
                }
            }
        }
    }

    /// Point-in-shape test. Rectangles are half-open like [`Rect`]; circles
    /// include their boundary; polygons use even-odd ray casting.
    pub fn contains_point(&self, p: Point) -> bool {
        match self {
            MaskGeometry::Rectangle { .. } => self.bounds().contains_point(p),
            MaskGeometry::Circle { cx, cy, radius } => {
                let r = radius.raw() as i128;
                p.distance_squared(Point::new(*cx, *cy)) <= r * r
            }
            MaskGeometry::Polygon { points } => polygon_contains(points, p),
        }
    }
}

fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let (px, py) = (p.x.raw() as i128, p.y.raw() as i128);
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (ax, ay) = (points[i].x.raw() as i128, points[i].y.raw() as i128);
        let (bx, by) = (points[j].x.raw() as i128, points[j].y.raw() as i128);
        if (ay > py) != (by > py) {
            // px < ax + (py - ay) * (bx - ax) / (by - ay), without dividing.
            let lhs = (px - ax) * (by - ay);
            let rhs = (py - ay) * (bx - ax);
            let crosses = if by > ay { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// An active mask and the tiles it currently hides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskShape {
    pub id: MaskId,
    pub label: Option<String>,
    pub geometry: MaskGeometry,
    /// Covered tiles in grid order; recomputed on every add/move/resize.
    pub covered: Vec<TileId>,
    /// Creation order among active masks.
    pub seq: u64,
}

impl MaskShape {
    pub fn new(id: impl Into<MaskId>, geometry: MaskGeometry) -> Self {
        Self {
            id: id.into(),
            label: None,
            geometry,
            covered: Vec::new(),
            seq: 0,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn covers(&self, tile: &str) -> bool {
        self.covered.iter().any(|t| t.as_str() == tile)
    }
}
