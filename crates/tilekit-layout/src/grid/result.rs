//! Grid generation output.

use super::engine::area_ratio_percent;
use super::input::LayoutInput;
use super::Grid;
use serde::{Deserialize, Serialize};
use tilekit_core::units::to_display;
use tilekit_core::{Dimension, Micro};

/// Size of a representative cut piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceInfo {
    pub size: Dimension,
    /// Truncated percentage of the nominal tile area.
    pub area_ratio_percent: u32,
}

impl PieceInfo {
    pub fn new(size: Dimension, nominal: Dimension) -> Self {
        Self {
            size,
            area_ratio_percent: area_ratio_percent(size, nominal),
        }
    }
}

/// Remainder share at each edge. `left + right` is the horizontal remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remainders {
    pub left: Micro,
    pub right: Micro,
    pub top: Micro,
    pub bottom: Micro,
}

/// Complete output of [`GridEngine::generate`](super::GridEngine::generate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub input: LayoutInput,
    pub total_tiles: usize,
    pub full_tiles: usize,
    pub large_pieces: usize,
    pub small_pieces: usize,
    pub columns: usize,
    pub rows: usize,
    pub large_piece: Option<PieceInfo>,
    pub small_piece: Option<PieceInfo>,
    pub remainders: Remainders,
    pub grid: Grid,
    pub total_area_m2: f64,
    /// Area covered by materialised cells.
    pub tile_area_m2: f64,
}

impl LayoutResult {
    /// Cut pieces of either class.
    pub fn cut_pieces(&self) -> usize {
        self.large_pieces + self.small_pieces
    }

    /// Display-unit digest without the cell array.
    pub fn summary(&self) -> LayoutSummary {
        let mm = |v: Micro| to_display(v, 3);
        let piece = |p: &PieceInfo| PieceSummary {
            width_mm: mm(p.size.width),
            height_mm: mm(p.size.height),
            area_ratio_percent: p.area_ratio_percent,
        };
        LayoutSummary {
            area_width_mm: mm(self.input.area_width),
            area_height_mm: mm(self.input.area_height),
            tile_width_mm: mm(self.input.tile_width),
            tile_height_mm: mm(self.input.tile_height),
            gap_mm: mm(self.input.gap),
            columns: self.columns,
            rows: self.rows,
            total_tiles: self.total_tiles,
            full_tiles: self.full_tiles,
            large_pieces: self.large_pieces,
            small_pieces: self.small_pieces,
            large_piece: self.large_piece.as_ref().map(piece),
            small_piece: self.small_piece.as_ref().map(piece),
            remainder_left_mm: mm(self.remainders.left),
            remainder_right_mm: mm(self.remainders.right),
            remainder_top_mm: mm(self.remainders.top),
            remainder_bottom_mm: mm(self.remainders.bottom),
            total_area_m2: round_to(self.total_area_m2, 4),
            tile_area_m2: round_to(self.tile_area_m2, 4),
        }
    }
}

/// Cut piece in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSummary {
    pub width_mm: f64,
    pub height_mm: f64,
    pub area_ratio_percent: u32,
}

/// Layout figures in display units, for reports and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub area_width_mm: f64,
    pub area_height_mm: f64,
    pub tile_width_mm: f64,
    pub tile_height_mm: f64,
    pub gap_mm: f64,
    pub columns: usize,
    pub rows: usize,
    pub total_tiles: usize,
    pub full_tiles: usize,
    pub large_pieces: usize,
    pub small_pieces: usize,
    pub large_piece: Option<PieceSummary>,
    pub small_piece: Option<PieceSummary>,
    pub remainder_left_mm: f64,
    pub remainder_right_mm: f64,
    pub remainder_top_mm: f64,
    pub remainder_bottom_mm: f64,
    pub total_area_m2: f64,
    pub tile_area_m2: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
