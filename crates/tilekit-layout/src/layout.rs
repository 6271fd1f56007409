//! The layout document: a patterned grid plus its masks.

use crate::grid::{Grid, GridConfig, GridEngine, LayoutInput, LayoutResult, TileId};
use crate::history::HistoryConfig;
use crate::masking::{
    MaskEvent, MaskGeometry, MaskRepository, MaskShape, MaskingConfig, MaskingEngine,
};
use crate::pattern::{
    ApplyPatternOptions, PatternConfig, PatternEngine, PatternRegistry,
};
use serde::{Deserialize, Serialize};
use tilekit_core::{CommandError, LayoutError, Micro, SubscriptionId};

/// Settings for every engine behind a [`TileLayout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub masking: MaskingConfig,
    pub history: HistoryConfig,
}

/// Generated layout with a pattern applied and masks on top.
///
/// The grid is owned by the masking engine; pattern changes replace it
/// wholesale and re-derive masking, tile edits mutate it in place.
#[derive(Debug)]
pub struct TileLayout {
    result: LayoutResult,
    masking: MaskingEngine,
    patterns: PatternEngine,
    pattern_id: String,
    pattern_config: PatternConfig,
}

impl TileLayout {
    /// Generates the base grid and applies `pattern_id` to it.
    pub fn generate(
        input: &LayoutInput,
        pattern_id: &str,
        config: &EngineConfig,
    ) -> Result<Self, LayoutError> {
        let result = GridEngine::with_config(config.grid).generate(input)?;
        Self::from_result(result, pattern_id, config.masking)
    }

    pub fn from_result(
        result: LayoutResult,
        pattern_id: &str,
        masking: MaskingConfig,
    ) -> Result<Self, LayoutError> {
        let patterns = PatternEngine::new();
        let pattern_config = PatternConfig::from_grid(&result.grid);
        let grid = patterns.apply_pattern(
            &result.grid,
            pattern_id,
            &pattern_config,
            &ApplyPatternOptions::default(),
        )?;
        tracing::info!(
            "Layout {}x{} created with pattern {}",
            result.columns,
            result.rows,
            pattern_id
        );
        Ok(Self {
            result,
            masking: MaskingEngine::with_config(grid, masking),
            patterns,
            pattern_id: pattern_id.to_string(),
            pattern_config,
        })
    }

    /// Generation output. Its grid is the unpatterned base grid.
    pub fn result(&self) -> &LayoutResult {
        &self.result
    }

    /// The live, patterned and masked grid.
    pub fn grid(&self) -> &Grid {
        self.masking.grid()
    }

    pub fn pattern_id(&self) -> &str {
        &self.pattern_id
    }

    pub fn pattern_config(&self) -> &PatternConfig {
        &self.pattern_config
    }

    pub fn patterns(&self) -> &PatternRegistry {
        self.patterns.registry()
    }

    pub fn masking(&self) -> &MaskingEngine {
        &self.masking
    }

    pub fn subscribe_masks<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MaskEvent) + 'static,
    {
        self.masking.subscribe(listener)
    }

    /// Switches pattern, keeping manual edits. Returns tiles whose visibility changed.
    pub fn set_pattern(&mut self, pattern_id: &str) -> Result<Vec<TileId>, LayoutError> {
        if pattern_id == self.pattern_id {
            self.patterns.registry().get(pattern_id)?;
            return Ok(Vec::new());
        }
        let grid = self.patterns.apply_pattern(
            self.masking.grid(),
            pattern_id,
            &self.pattern_config,
            &ApplyPatternOptions::default().replacing(self.pattern_id.clone()),
        )?;
        let changed = self.masking.replace_grid(grid);
        tracing::info!("Pattern changed from {} to {}", self.pattern_id, pattern_id);
        self.pattern_id = pattern_id.to_string();
        Ok(changed)
    }

    /// Shifts one tile. Locked tiles are rejected.
    pub fn move_tile(&mut self, id: &str, dx: Micro, dy: Micro) -> Result<Vec<TileId>, CommandError> {
        let cell = self.editable_cell(id)?;
        cell.translate(dx, dy);
        let tile_id = cell.id.clone();
        self.masking.refresh_tiles(std::slice::from_ref(&tile_id));
        Ok(vec![tile_id])
    }

    /// Rotates one tile by quarter turns. Sized pieces swap sides on odd turns.
    pub fn rotate_tile(&mut self, id: &str, quarter_turns: i64) -> Result<Vec<TileId>, CommandError> {
        let cell = self.editable_cell(id)?;
        cell.rotation = cell.rotation.rotated_by(quarter_turns);
        if quarter_turns.rem_euclid(2) == 1 {
            cell.piece.swap_dimensions();
        }
        let tile_id = cell.id.clone();
        self.masking.refresh_tiles(std::slice::from_ref(&tile_id));
        Ok(vec![tile_id])
    }

    /// Sets the lock flag and returns the previous one.
    pub fn set_tile_locked(&mut self, id: &str, locked: bool) -> Result<bool, CommandError> {
        let cell = self
            .masking
            .grid_mut()
            .cell_mut(id)
            .ok_or_else(|| CommandError::target_missing(id))?;
        Ok(std::mem::replace(&mut cell.locked, locked))
    }

    fn editable_cell(&mut self, id: &str) -> Result<&mut crate::grid::TileCell, CommandError> {
        let cell = self
            .masking
            .grid_mut()
            .cell_mut(id)
            .ok_or_else(|| CommandError::target_missing(id))?;
        if cell.locked {
            return Err(CommandError::TileLocked { id: id.to_string() });
        }
        Ok(cell)
    }
}

impl MaskRepository for TileLayout {
    fn insert_mask(&mut self, shape: MaskShape) -> Result<Vec<TileId>, LayoutError> {
        self.masking.insert_mask(shape)
    }

    fn take_mask(&mut self, id: &str) -> Option<MaskShape> {
        self.masking.take_mask(id)
    }

    fn translate_mask(&mut self, id: &str, dx: Micro, dy: Micro) -> Option<Vec<TileId>> {
        self.masking.translate_mask(id, dx, dy)
    }

    fn reshape_mask(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
    ) -> Result<Option<Vec<TileId>>, LayoutError> {
        self.masking.reshape_mask(id, geometry)
    }

    fn mask_geometry(&self, id: &str) -> Option<&MaskGeometry> {
        self.masking.mask_geometry(id)
    }
}
