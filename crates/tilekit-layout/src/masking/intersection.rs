//! Shape/tile intersection classification.

use super::shape::MaskGeometry;
use serde::{Deserialize, Serialize};
use tilekit_core::{Point, Rect};

/// Default overlap, in percent of the tile area, below which a rectangle
/// overlap is treated as a negligible sliver.
pub const DEFAULT_MINIMAL_OVERLAP_PERCENT: u8 = 5;

/// How a mask overlaps one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionType {
    None,
    Full,
    /// Mask cuts into the tile from its left edge only.
    PartialLeft,
    PartialRight,
    PartialTop,
    PartialBottom,
    /// Corner cuts, interior holes, bands across the tile, and every sampled
    /// circle/polygon partial overlap.
    PartialCorner,
    /// Overlap below the minimal threshold.
    Minimal,
}

impl IntersectionType {
    /// Whether a tile with this intersection gets hidden.
    pub fn hides_tile(self) -> bool {
        !matches!(self, IntersectionType::None | IntersectionType::Minimal)
    }
}

/// Classification plus overlap ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub kind: IntersectionType,
    pub ratio: f64,
}

impl Intersection {
    pub const NONE: Intersection = Intersection {
        kind: IntersectionType::None,
        ratio: 0.0,
    };

    pub fn hides_tile(&self) -> bool {
        self.kind.hides_tile()
    }
}

/// Classifies `geometry` against the tile occupying `tile`.
pub fn classify(geometry: &MaskGeometry, tile: Rect, minimal_percent: u8) -> Intersection {
    match geometry {
        MaskGeometry::Rectangle {
            x,
            y,
            width,
            height,
        } => classify_rectangle(Rect::from_xywh(*x, *y, *width, *height), tile, minimal_percent),
        MaskGeometry::Circle { .. } | MaskGeometry::Polygon { .. } => classify_sampled(geometry, tile),
    }
}

/// Exact axis-aligned overlap.
pub fn classify_rectangle(mask: Rect, tile: Rect, minimal_percent: u8) -> Intersection {
    let tile_area = tile.area();
    if tile_area <= 0 {
        return Intersection::NONE;
    }
    let Some(overlap) = tile.intersection(&mask) else {
        return Intersection::NONE;
    };
    let overlap_area = overlap.area();
    let ratio = overlap_area as f64 / tile_area as f64;

    if overlap_area == tile_area {
        return Intersection {
            kind: IntersectionType::Full,
            ratio: 1.0,
        };
    }
    if overlap_area * 100 < i128::from(minimal_percent) * tile_area {
        return Intersection {
            kind: IntersectionType::Minimal,
            ratio,
        };
    }
    Intersection {
        kind: cut_direction(&overlap, &tile),
        ratio,
    }
}

fn cut_direction(overlap: &Rect, tile: &Rect) -> IntersectionType {
    let touches_left = overlap.left() == tile.left();
    let touches_right = overlap.right() == tile.right();
    let touches_top = overlap.top() == tile.top();
    let touches_bottom = overlap.bottom() == tile.bottom();

    let horizontal = match (touches_left, touches_right) {
        (true, false) => Some(IntersectionType::PartialLeft),
        (false, true) => Some(IntersectionType::PartialRight),
        _ => None,
    };
    let vertical = match (touches_top, touches_bottom) {
        (true, false) => Some(IntersectionType::PartialTop),
        (false, true) => Some(IntersectionType::PartialBottom),
        _ => None,
    };
    match (horizontal, vertical) {
        (Some(side), None) | (None, Some(side)) => side,
        _ => IntersectionType::PartialCorner,
    }
}

/// Five-point approximation: four corners and the centre.
pub fn classify_sampled(geometry: &MaskGeometry, tile: Rect) -> Intersection {
    let inside = sample_points(tile)
        .iter()
        .filter(|p| geometry.contains_point(**p))
        .count();
    let kind = match inside {
        0 => IntersectionType::None,
        5 => IntersectionType::Full,
        _ => IntersectionType::PartialCorner,
    };
    Intersection {
        kind,
        ratio: inside as f64 / 5.0,
    }
}

fn sample_points(tile: Rect) -> [Point; 5] {
    let [a, b, c, d] = tile.corners();
    [a, b, c, d, tile.center()]
}
