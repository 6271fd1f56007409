//! Layout grid: generation and the cell container.

mod cell;
mod engine;
mod input;
mod result;

pub use cell::{CutClass, PieceType, Rotation, TileCell, TileId, TilePiece};
pub use engine::{classify_piece_type, plan_axis, AxisPlan, AxisSegment, GridConfig, GridEngine};
pub use input::{LayoutInput, StartLine, AREA_RANGE_MM, GAP_RANGE_MM, MAX_CELLS, TILE_RANGE_MM};
pub use result::{LayoutResult, LayoutSummary, PieceInfo, PieceSummary, Remainders};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tilekit_core::{Dimension, Micro, Point};

/// Row-major rectangular array of tile cells.
///
/// The grid owns a `TileId -> (row, col)` index so commands can resolve their
/// targets by id after the grid has been replaced by a re-patterned copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridData")]
pub struct Grid {
    rows: Vec<Vec<TileCell>>,
    tile_size: Dimension,
    gap: Micro,
    #[serde(skip)]
    index: HashMap<TileId, (usize, usize)>,
}

#[derive(Deserialize)]
struct GridData {
    rows: Vec<Vec<TileCell>>,
    tile_size: Dimension,
    gap: Micro,
}

impl From<GridData> for Grid {
    fn from(data: GridData) -> Self {
        Grid::new(data.rows, data.tile_size, data.gap)
    }
}

impl Grid {
    pub fn new(rows: Vec<Vec<TileCell>>, tile_size: Dimension, gap: Micro) -> Self {
        let index = build_index(&rows);
        Self {
            rows,
            tile_size,
            gap,
            index,
        }
    }

    pub fn empty(tile_size: Dimension, gap: Micro) -> Self {
        Self::new(Vec::new(), tile_size, gap)
    }

    /// Nominal size of a full tile.
    pub fn tile_size(&self) -> Dimension {
        self.tile_size
    }

    pub fn gap(&self) -> Micro {
        self.gap
    }

    pub fn rows(&self) -> &[Vec<TileCell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = &TileCell> {
        self.rows.iter().flatten()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TileCell> {
        self.rows.iter_mut().flatten()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&TileCell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut TileCell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Grid coordinates of the cell with this id.
    pub fn position_of(&self, id: &str) -> Option<(usize, usize)> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn cell(&self, id: &str) -> Option<&TileCell> {
        let (row, col) = self.position_of(id)?;
        self.get(row, col)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut TileCell> {
        let (row, col) = self.position_of(id)?;
        self.get_mut(row, col)
    }

    pub fn visible_count(&self) -> usize {
        self.cells().filter(|c| c.visible).count()
    }

    /// Topmost visible cell whose footprint contains `point`. Later cells in
    /// row-major order are considered to lie above earlier ones.
    pub fn cell_at_point(&self, point: Point) -> Option<&TileCell> {
        let nominal = self.tile_size;
        self.rows
            .iter()
            .rev()
            .flat_map(|row| row.iter().rev())
            .find(|c| c.visible && c.bounds(nominal).contains_point(point))
    }
}

fn build_index(rows: &[Vec<TileCell>]) -> HashMap<TileId, (usize, usize)> {
    let mut index = HashMap::with_capacity(rows.iter().map(Vec::len).sum());
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            index.insert(cell.id.clone(), (r, c));
        }
    }
    index
}
