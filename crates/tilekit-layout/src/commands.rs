//! Reversible layout edits.
//!
//! Every command stores only the delta it needs and resolves its target tile
//! or mask by id each time it runs, so it keeps working after the grid has
//! been replaced by a pattern change.

use crate::grid::TileId;
use crate::history::{Command, CommandResult};
use crate::layout::TileLayout;
use crate::masking::{MaskGeometry, MaskId, MaskRepository, MaskShape};
use tilekit_core::{CommandError, Dimension, Micro};

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutCommand {
    MoveTile(MoveTile),
    RotateTile(RotateTile),
    SetTileLock(SetTileLock),
    AddMask(AddMask),
    RemoveMask(RemoveMask),
    MoveMask(MoveMask),
    ResizeMask(ResizeMask),
    ChangePattern(ChangePattern),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTile {
    pub tile_id: TileId,
    pub dx: Micro,
    pub dy: Micro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateTile {
    pub tile_id: TileId,
    pub quarter_turns: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTileLock {
    pub tile_id: TileId,
    pub locked: bool,
    /// Flag before the last execution.
    pub previous: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMask {
    /// Shape to activate; holds its assigned creation order after the first run.
    pub shape: MaskShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMask {
    pub mask_id: MaskId,
    /// Some while removed.
    pub removed: Option<MaskShape>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMask {
    pub mask_id: MaskId,
    pub dx: Micro,
    pub dy: Micro,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeMask {
    pub mask_id: MaskId,
    pub size: Dimension,
    /// Geometry before the last execution.
    pub before: Option<MaskGeometry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePattern {
    pub from: String,
    pub to: String,
}

impl LayoutCommand {
    pub fn move_tile(tile_id: impl Into<TileId>, dx: Micro, dy: Micro) -> Self {
        LayoutCommand::MoveTile(MoveTile {
            tile_id: tile_id.into(),
            dx,
            dy,
        })
    }

    pub fn rotate_tile(tile_id: impl Into<TileId>, quarter_turns: i64) -> Self {
        LayoutCommand::RotateTile(RotateTile {
            tile_id: tile_id.into(),
            quarter_turns,
        })
    }

    pub fn set_tile_lock(tile_id: impl Into<TileId>, locked: bool) -> Self {
        LayoutCommand::SetTileLock(SetTileLock {
            tile_id: tile_id.into(),
            locked,
            previous: None,
        })
    }

    pub fn add_mask(shape: MaskShape) -> Self {
        LayoutCommand::AddMask(AddMask { shape })
    }

    pub fn remove_mask(mask_id: impl Into<MaskId>) -> Self {
        LayoutCommand::RemoveMask(RemoveMask {
            mask_id: mask_id.into(),
            removed: None,
        })
    }

    pub fn move_mask(mask_id: impl Into<MaskId>, dx: Micro, dy: Micro) -> Self {
        LayoutCommand::MoveMask(MoveMask {
            mask_id: mask_id.into(),
            dx,
            dy,
        })
    }

    pub fn resize_mask(mask_id: impl Into<MaskId>, size: Dimension) -> Self {
        LayoutCommand::ResizeMask(ResizeMask {
            mask_id: mask_id.into(),
            size,
            before: None,
        })
    }

    pub fn change_pattern(from: impl Into<String>, to: impl Into<String>) -> Self {
        LayoutCommand::ChangePattern(ChangePattern {
            from: from.into(),
            to: to.into(),
        })
    }

    fn apply(&mut self, layout: &mut TileLayout) -> Result<Vec<String>, CommandError> {
        match self {
            LayoutCommand::MoveTile(cmd) => {
                let ids = layout.move_tile(cmd.tile_id.as_str(), cmd.dx, cmd.dy)?;
                Ok(tile_strings(ids))
            }
            LayoutCommand::RotateTile(cmd) => {
                let ids = layout.rotate_tile(cmd.tile_id.as_str(), cmd.quarter_turns)?;
                Ok(tile_strings(ids))
            }
            LayoutCommand::SetTileLock(cmd) => {
                let previous = layout.set_tile_locked(cmd.tile_id.as_str(), cmd.locked)?;
                cmd.previous = Some(previous);
                Ok(vec![cmd.tile_id.to_string()])
            }
            LayoutCommand::AddMask(cmd) => {
                let covered = layout.insert_mask(cmd.shape.clone())?;
                if let Some(active) = layout.masking().get_mask(cmd.shape.id.as_str()) {
                    cmd.shape.seq = active.seq;
                }
                Ok(mask_and_tiles(&cmd.shape.id, covered))
            }
            LayoutCommand::RemoveMask(cmd) => {
                let shape = layout
                    .take_mask(cmd.mask_id.as_str())
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                let ids = mask_and_tiles(&cmd.mask_id, shape.covered.clone());
                cmd.removed = Some(shape);
                Ok(ids)
            }
            LayoutCommand::MoveMask(cmd) => {
                let ids = layout
                    .translate_mask(cmd.mask_id.as_str(), cmd.dx, cmd.dy)
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                Ok(mask_and_tiles(&cmd.mask_id, ids))
            }
            LayoutCommand::ResizeMask(cmd) => {
                let before = layout
                    .mask_geometry(cmd.mask_id.as_str())
                    .cloned()
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                let resized = before.resized(cmd.size);
                let ids = layout
                    .reshape_mask(cmd.mask_id.as_str(), resized)?
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                cmd.before = Some(before);
                Ok(mask_and_tiles(&cmd.mask_id, ids))
            }
            LayoutCommand::ChangePattern(cmd) => {
                let ids = layout.set_pattern(&cmd.to)?;
                Ok(tile_strings(ids))
            }
        }
    }

    fn revert(&mut self, layout: &mut TileLayout) -> Result<Vec<String>, CommandError> {
        match self {
            LayoutCommand::MoveTile(cmd) => {
                let ids = layout.move_tile(cmd.tile_id.as_str(), -cmd.dx, -cmd.dy)?;
                Ok(tile_strings(ids))
            }
            LayoutCommand::RotateTile(cmd) => {
                let ids = layout.rotate_tile(cmd.tile_id.as_str(), -cmd.quarter_turns)?;
                Ok(tile_strings(ids))
            }
            LayoutCommand::SetTileLock(cmd) => {
                let previous = cmd.previous.unwrap_or(!cmd.locked);
                layout.set_tile_locked(cmd.tile_id.as_str(), previous)?;
                Ok(vec![cmd.tile_id.to_string()])
            }
            LayoutCommand::AddMask(cmd) => {
                let shape = layout
                    .take_mask(cmd.shape.id.as_str())
                    .ok_or_else(|| CommandError::target_missing(cmd.shape.id.as_str()))?;
                let ids = mask_and_tiles(&shape.id, shape.covered.clone());
                cmd.shape.seq = shape.seq;
                Ok(ids)
            }
            LayoutCommand::RemoveMask(cmd) => {
                let shape = cmd
                    .removed
                    .clone()
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                let covered = layout.insert_mask(shape)?;
                cmd.removed = None;
                Ok(mask_and_tiles(&cmd.mask_id, covered))
            }
            LayoutCommand::MoveMask(cmd) => {
                let ids = layout
                    .translate_mask(cmd.mask_id.as_str(), -cmd.dx, -cmd.dy)
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                Ok(mask_and_tiles(&cmd.mask_id, ids))
            }
            LayoutCommand::ResizeMask(cmd) => {
                let before = cmd
                    .before
                    .clone()
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                let ids = layout
                    .reshape_mask(cmd.mask_id.as_str(), before)?
                    .ok_or_else(|| CommandError::target_missing(cmd.mask_id.as_str()))?;
                Ok(mask_and_tiles(&cmd.mask_id, ids))
            }
            LayoutCommand::ChangePattern(cmd) => {
                let ids = layout.set_pattern(&cmd.from)?;
                Ok(tile_strings(ids))
            }
        }
    }
}

impl Command for LayoutCommand {
    type Target = TileLayout;

    fn execute(&mut self, layout: &mut TileLayout) -> CommandResult {
        self.apply(layout).into()
    }

    fn undo(&mut self, layout: &mut TileLayout) -> CommandResult {
        self.revert(layout).into()
    }

    fn description(&self) -> String {
        match self {
            LayoutCommand::MoveTile(cmd) => format!("Move tile {}", cmd.tile_id),
            LayoutCommand::RotateTile(cmd) => format!("Rotate tile {}", cmd.tile_id),
            LayoutCommand::SetTileLock(cmd) if cmd.locked => format!("Lock tile {}", cmd.tile_id),
            LayoutCommand::SetTileLock(cmd) => format!("Unlock tile {}", cmd.tile_id),
            LayoutCommand::AddMask(cmd) => format!("Add mask {}", cmd.shape.id),
            LayoutCommand::RemoveMask(cmd) => format!("Remove mask {}", cmd.mask_id),
            LayoutCommand::MoveMask(cmd) => format!("Move mask {}", cmd.mask_id),
            LayoutCommand::ResizeMask(cmd) => format!("Resize mask {}", cmd.mask_id),
            LayoutCommand::ChangePattern(cmd) => format!("Change pattern to {}", cmd.to),
        }
    }

    fn can_merge_with(&self, next: &Self) -> bool {
        match (self, next) {
            (LayoutCommand::MoveTile(a), LayoutCommand::MoveTile(b)) => a.tile_id == b.tile_id,
            (LayoutCommand::MoveMask(a), LayoutCommand::MoveMask(b)) => a.mask_id == b.mask_id,
            _ => false,
        }
    }

    fn merge_with(&self, next: &Self) -> Option<Self> {
        match (self, next) {
            (LayoutCommand::MoveTile(a), LayoutCommand::MoveTile(b)) if a.tile_id == b.tile_id => {
                Some(LayoutCommand::MoveTile(MoveTile {
                    tile_id: a.tile_id.clone(),
                    dx: a.dx + b.dx,
                    dy: a.dy + b.dy,
                }))
            }
            (LayoutCommand::MoveMask(a), LayoutCommand::MoveMask(b)) if a.mask_id == b.mask_id => {
                Some(LayoutCommand::MoveMask(MoveMask {
                    mask_id: a.mask_id.clone(),
                    dx: a.dx + b.dx,
                    dy: a.dy + b.dy,
                }))
            }
            _ => None,
        }
    }
}

fn tile_strings(ids: Vec<TileId>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_string()).collect()
}

fn mask_and_tiles(mask: &MaskId, tiles: Vec<TileId>) -> Vec<String> {
    let mut ids = Vec::with_capacity(tiles.len() + 1);
    ids.push(mask.to_string());
    ids.extend(tiles.into_iter().map(|id| id.to_string()));
    ids
}
