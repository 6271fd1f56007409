//! Layout input and its accepted ranges.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tilekit_core::{Dimension, Micro};

/// Accepted area side, display millimetres.
pub const AREA_RANGE_MM: RangeInclusive<i64> = 100..=99_999_999;

/// Accepted tile side, display millimetres.
pub const TILE_RANGE_MM: RangeInclusive<i64> = 10..=9_999;

/// Accepted joint width, display millimetres.
pub const GAP_RANGE_MM: RangeInclusive<i64> = 0..=50;

/// Default hard cap on generated cells.
pub const MAX_CELLS: usize = 10_000;

/// Which edge of an axis anchors the full tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartLine {
    /// Full tiles start at the near edge (left/top); the cut lands at the far edge.
    #[default]
    Start,
    /// Cuts are split between both edges.
    Center,
    /// Full tiles start at the far edge (right/bottom); the cut lands at the near edge.
    End,
}

impl std::str::FromStr for StartLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" | "left" | "top" => Ok(Self::Start),
            "center" | "centre" => Ok(Self::Center),
            "end" | "right" | "bottom" => Ok(Self::End),
            _ => Err(format!("Unknown start line: {}", s)),
        }
    }
}

/// Everything the grid engine needs to lay out one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub area_width: Micro,
    pub area_height: Micro,
    pub tile_width: Micro,
    pub tile_height: Micro,
    pub gap: Micro,
    #[serde(default)]
    pub start_x: StartLine,
    #[serde(default)]
    pub start_y: StartLine,
}

impl LayoutInput {
    pub fn new(area: Dimension, tile: Dimension, gap: Micro) -> Self {
        Self {
            area_width: area.width,
            area_height: area.height,
            tile_width: tile.width,
            tile_height: tile.height,
            gap,
            start_x: StartLine::Start,
            start_y: StartLine::Start,
        }
    }

    /// Input from whole display millimetres.
    pub fn from_mm(area: (i64, i64), tile: (i64, i64), gap: i64) -> Self {
        Self::new(
            Dimension::from_mm(area.0, area.1),
            Dimension::from_mm(tile.0, tile.1),
            Micro::from_mm(gap),
        )
    }

    pub fn with_alignment(mut self, start_x: StartLine, start_y: StartLine) -> Self {
        self.start_x = start_x;
        self.start_y = start_y;
        self
    }

    pub fn area(&self) -> Dimension {
        Dimension::new(self.area_width, self.area_height)
    }

    pub fn tile(&self) -> Dimension {
        Dimension::new(self.tile_width, self.tile_height)
    }
}
