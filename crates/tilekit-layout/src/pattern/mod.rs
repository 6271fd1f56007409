//! Laying patterns.
//!
//! A pattern repositions the cells of a base grid without rebuilding it: each
//! cell receives an offset, a rotation and possibly swapped sides. Applying a
//! pattern always produces a new grid; the source grid is left untouched.

pub mod offsets;
pub mod registry;

pub use offsets::{OffsetContext, PatternOffset};
pub use registry::{
    CompatibilityWarning, LocalizedName, PatternCategory, PatternDefinition, PatternRegistry,
};

use crate::grid::{Grid, TileCell};
use serde::{Deserialize, Serialize};
use tilekit_core::{LayoutError, Micro};

/// Nominal geometry the offsets are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub tile_width: Micro,
    pub tile_height: Micro,
    pub gap: Micro,
}

impl PatternConfig {
    pub fn from_grid(grid: &Grid) -> Self {
        let tile = grid.tile_size();
        Self {
            tile_width: tile.width,
            tile_height: tile.height,
            gap: grid.gap(),
        }
    }

    fn context(&self, row: usize, col: usize) -> OffsetContext {
        OffsetContext {
            row,
            col,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            gap: self.gap,
        }
    }
}

/// What to carry over from the source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPatternOptions {
    pub preserve_visibility: bool,
    pub preserve_masks: bool,
    pub preserve_locks: bool,
    /// Pattern currently applied to the source grid. Its offsets are removed
    /// first, so manual edits survive and the change can be reversed exactly.
    pub replacing: Option<String>,
}

impl Default for ApplyPatternOptions {
    fn default() -> Self {
        Self {
            preserve_visibility: true,
            preserve_masks: true,
            preserve_locks: true,
            replacing: None,
        }
    }
}

impl ApplyPatternOptions {
    /// Fresh cells: visible, unmasked, unlocked.
    pub fn reset() -> Self {
        Self {
            preserve_visibility: false,
            preserve_masks: false,
            preserve_locks: false,
            replacing: None,
        }
    }

    pub fn replacing(mut self, pattern_id: impl Into<String>) -> Self {
        self.replacing = Some(pattern_id.into());
        self
    }
}

/// Applies registered patterns to grids.
#[derive(Debug, Clone, Default)]
pub struct PatternEngine {
    registry: PatternRegistry,
}

impl PatternEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PatternRegistry {
        &mut self.registry
    }

    /// Returns a repositioned deep copy of `grid`.
    ///
    /// Positions are shifted by the pattern offset and rotations set to the
    /// pattern rotation. Sized pieces have their sides exchanged when the
    /// offset asks for it; `Full` pieces resolve their size from the grid.
    pub fn apply_pattern(
        &self,
        grid: &Grid,
        pattern_id: &str,
        config: &PatternConfig,
        options: &ApplyPatternOptions,
    ) -> Result<Grid, LayoutError> {
        let pattern = self.registry.get(pattern_id)?;
        let previous = options
            .replacing
            .as_deref()
            .map(|id| self.registry.get(id))
            .transpose()?;

        let rows: Vec<Vec<TileCell>> = grid
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let ctx = config.context(cell.row, cell.col);
                        let offset = pattern.offset(&ctx);
                        let undo = previous.map(|p| p.offset(&ctx));
                        reposition(cell, &offset, undo.as_ref(), options)
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            "Applied pattern {} to {} cells{}",
            pattern.id,
            grid.cell_count(),
            previous.map_or(String::new(), |p| format!(" (replacing {})", p.id))
        );
        Ok(Grid::new(rows, grid.tile_size(), grid.gap()))
    }
}

fn reposition(
    source: &TileCell,
    offset: &PatternOffset,
    previous: Option<&PatternOffset>,
    options: &ApplyPatternOptions,
) -> TileCell {
    let mut cell = source.clone();
    let mut swap = offset.swap_dimensions;

    match previous {
        Some(old) => {
            cell.translate(-old.dx, -old.dy);
            cell.rotation = cell.rotation.minus(old.rotation).plus(offset.rotation);
            swap ^= old.swap_dimensions;
        }
        None => cell.rotation = offset.rotation,
    }
    cell.translate(offset.dx, offset.dy);
    if swap {
        cell.piece.swap_dimensions();
    }

    if !options.preserve_masks {
        cell.masked_by.clear();
    }
    if !options.preserve_visibility {
        cell.visible = true;
    }
    if !options.preserve_locks {
        cell.locked = false;
    }
    cell
}
