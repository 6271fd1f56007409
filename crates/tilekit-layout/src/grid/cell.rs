//! Tile cells: the unit the grid, pattern and masking engines operate on.

use crate::masking::MaskId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Borrow;
use std::fmt;
use tilekit_core::{Dimension, Micro, Point, Rect};

/// Stable cell identity, `tile_<row>_<col>` at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id assigned to the cell generated at `(row, col)`.
    pub fn for_cell(row: usize, col: usize) -> Self {
        Self(format!("tile_{}_{}", row, col))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Quarter-turn rotation of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn quarter_turns(self) -> i64 {
        i64::from(self.degrees() / 90)
    }

    /// Any integer number of quarter turns, wrapped into `0..4`.
    pub fn from_quarter_turns(turns: i64) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn rotated_by(self, turns: i64) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + turns)
    }

    pub fn plus(self, other: Rotation) -> Self {
        self.rotated_by(other.quarter_turns())
    }

    pub fn minus(self, other: Rotation) -> Self {
        self.rotated_by(-other.quarter_turns())
    }

    /// 90° or 270°: the footprint's sides are exchanged.
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("Rotation must be 0, 90, 180 or 270, got {}", degrees))
    }
}

/// Piece classification of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    Full,
    Large,
    Small,
    Split,
}

/// Size class of a cut piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutClass {
    Large,
    Small,
}

/// What a cell is made of.
///
/// `Full` carries no size: consumers resolve it from the grid's nominal tile
/// size. Cut and split pieces always carry their own size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TilePiece {
    Full,
    Cut {
        class: CutClass,
        size: Dimension,
    },
    Split {
        size: Dimension,
        parent: TileId,
        ratio_percent: u8,
    },
}

impl TilePiece {
    pub fn cut(class: CutClass, size: Dimension) -> Self {
        TilePiece::Cut { class, size }
    }

    pub fn piece_type(&self) -> PieceType {
        match self {
            TilePiece::Full => PieceType::Full,
            TilePiece::Cut {
                class: CutClass::Large,
                ..
            } => PieceType::Large,
            TilePiece::Cut {
                class: CutClass::Small,
                ..
            } => PieceType::Small,
            TilePiece::Split { .. } => PieceType::Split,
        }
    }

    pub fn explicit_size(&self) -> Option<Dimension> {
        match self {
            TilePiece::Full => None,
            TilePiece::Cut { size, .. } | TilePiece::Split { size, .. } => Some(*size),
        }
    }

    /// Exchanges width and height of a sized piece. `Full` pieces are untouched.
    pub fn swap_dimensions(&mut self) {
        match self {
            TilePiece::Full => {}
            TilePiece::Cut { size, .. } | TilePiece::Split { size, .. } => {
                *size = size.swapped();
            }
        }
    }
}

/// One cell of the layout grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCell {
    pub id: TileId,
    pub piece: TilePiece,
    pub row: usize,
    pub col: usize,
    /// Top-left corner.
    pub position: Point,
    pub rotation: Rotation,
    pub visible: bool,
    /// Masks currently covering this cell, in the order they were applied.
    pub masked_by: SmallVec<[MaskId; 2]>,
    pub locked: bool,
}

impl TileCell {
    pub fn new(row: usize, col: usize, position: Point, piece: TilePiece) -> Self {
        Self {
            id: TileId::for_cell(row, col),
            piece,
            row,
            col,
            position,
            rotation: Rotation::Deg0,
            visible: true,
            masked_by: SmallVec::new(),
            locked: false,
        }
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece.piece_type()
    }

    /// Width and height, falling back to `nominal` for full tiles.
    pub fn resolved_size(&self, nominal: Dimension) -> Dimension {
        self.piece.explicit_size().unwrap_or(nominal)
    }

    /// Area the cell occupies on the surface.
    ///
    /// Full tiles at 90°/270° occupy the swapped nominal size; sized pieces
    /// already store the oriented size.
    pub fn footprint(&self, nominal: Dimension) -> Dimension {
        match self.piece.explicit_size() {
            Some(size) => size,
            None if self.rotation.is_quarter_turn() => nominal.swapped(),
            None => nominal,
        }
    }

    pub fn bounds(&self, nominal: Dimension) -> Rect {
        Rect::new(self.position, self.footprint(nominal))
    }

    pub fn is_masked(&self) -> bool {
        !self.masked_by.is_empty()
    }

    pub fn is_masked_by(&self, mask: &MaskId) -> bool {
        self.masked_by.contains(mask)
    }

    pub fn translate(&mut self, dx: Micro, dy: Micro) {
        self.position = self.position.translated(dx, dy);
    }
}
