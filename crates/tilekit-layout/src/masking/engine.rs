//! Non-destructive masking over a layout grid.
//!
//! Masks never delete cells. Adding a mask hides the cells it covers and
//! records the mask id on each of them; removing or moving it reverses exactly
//! that bookkeeping. A cell is visible if and only if no active mask covers it.

use super::intersection::{self, Intersection, DEFAULT_MINIMAL_OVERLAP_PERCENT};
use super::shape::{MaskGeometry, MaskId, MaskShape};
use crate::grid::{Grid, TileCell, TileId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use tilekit_core::{Dimension, LayoutError, ListenerRegistry, Micro, Point, Rect, SubscriptionId};

/// Masking settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// Rectangle overlaps below this share of the tile area are ignored.
    pub minimal_overlap_percent: u8,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            minimal_overlap_percent: DEFAULT_MINIMAL_OVERLAP_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskEventKind {
    Added,
    Removed,
    Moved,
    Resized,
    /// Cells were re-evaluated after a grid change or tile move.
    Refreshed,
    Cleared,
}

/// Emitted after every masking mutation with every tile it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskEvent {
    pub kind: MaskEventKind,
    pub mask_id: Option<MaskId>,
    pub tile_ids: Vec<TileId>,
}

type TileMasks = HashMap<TileId, SmallVec<[MaskId; 2]>>;

/// Owns the active masks and applies them to a grid.
#[derive(Debug)]
pub struct MaskingEngine {
    grid: Grid,
    masks: HashMap<MaskId, MaskShape>,
    tile_masks: TileMasks,
    config: MaskingConfig,
    next_seq: u64,
    listeners: ListenerRegistry<MaskEvent>,
}

impl MaskingEngine {
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, MaskingConfig::default())
    }

    pub fn with_config(grid: Grid, config: MaskingConfig) -> Self {
        Self {
            grid,
            masks: HashMap::new(),
            tile_masks: HashMap::new(),
            config,
            next_seq: 1,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct cell access for tile edits. Call [`refresh_tiles`](Self::refresh_tiles)
    /// for every cell whose footprint changed.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &MaskingConfig {
        &self.config
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MaskEvent) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn add_rectangle_mask(
        &mut self,
        id: impl Into<MaskId>,
        rect: Rect,
        label: Option<String>,
    ) -> Result<MaskShape, LayoutError> {
        self.add_mask(id, MaskGeometry::rectangle(rect), label)
    }

    pub fn add_circle_mask(
        &mut self,
        id: impl Into<MaskId>,
        center: Point,
        radius: Micro,
        label: Option<String>,
    ) -> Result<MaskShape, LayoutError> {
        self.add_mask(id, MaskGeometry::circle(center, radius), label)
    }

    pub fn add_polygon_mask(
        &mut self,
        id: impl Into<MaskId>,
        points: Vec<Point>,
        label: Option<String>,
    ) -> Result<MaskShape, LayoutError> {
        self.add_mask(id, MaskGeometry::polygon(points), label)
    }

    /// Adds a mask and hides every cell it covers.
    pub fn add_mask(
        &mut self,
        id: impl Into<MaskId>,
        geometry: MaskGeometry,
        label: Option<String>,
    ) -> Result<MaskShape, LayoutError> {
        let mut shape = MaskShape::new(id, geometry);
        shape.label = label;
        shape.seq = self.next_seq;
        let id = shape.id.clone();
        self.insert_shape(shape)?;
        self.masks
            .get(&id)
            .cloned()
            .ok_or_else(|| LayoutError::InvalidMaskGeometry {
                id: id.to_string(),
                reason: "mask vanished during insertion".to_string(),
            })
    }

    /// Re-activates a previously detached shape, keeping its creation order.
    /// The covered set is recomputed against the current grid.
    pub fn insert_shape(&mut self, mut shape: MaskShape) -> Result<Vec<TileId>, LayoutError> {
        if self.masks.contains_key(&shape.id) {
            return Err(LayoutError::DuplicateMaskId {
                id: shape.id.to_string(),
            });
        }
        shape.geometry.validate(&shape.id)?;

        shape.covered = mask_cells(
            &mut self.grid,
            &mut self.tile_masks,
            &shape.id,
            &shape.geometry,
            self.config.minimal_overlap_percent,
        );
        if shape.seq == 0 {
            shape.seq = self.next_seq;
        }
        self.next_seq = self.next_seq.max(shape.seq + 1);

        let covered = shape.covered.clone();
        tracing::debug!(
            "Mask {} ({}) covers {} tiles",
            shape.id,
            shape.geometry.kind(),
            covered.len()
        );
        let id = shape.id.clone();
        self.masks.insert(id.clone(), shape);
        self.notify(MaskEventKind::Added, Some(id), covered.clone());
        Ok(covered)
    }

    /// Removes a mask and returns the cells that became visible again.
    /// Unknown ids are a no-op.
    pub fn remove_mask(&mut self, id: &str) -> Vec<TileId> {
        let Some(shape) = self.detach(id) else {
            return Vec::new();
        };
        let restored = self.visible_subset(&shape.covered);
        self.notify(MaskEventKind::Removed, Some(shape.id), shape.covered);
        restored
    }

    /// Removes a mask and hands it back, covered set intact.
    pub fn take_shape(&mut self, id: &str) -> Option<MaskShape> {
        let shape = self.detach(id)?;
        self.notify(
            MaskEventKind::Removed,
            Some(shape.id.clone()),
            shape.covered.clone(),
        );
        Some(shape)
    }

    /// Moves the mask so its anchor lands on `position`.
    pub fn move_shape(&mut self, id: &str, position: Point) -> Vec<TileId> {
        let Some(geometry) = self.masks.get(id).map(|m| m.geometry.moved_to(position)) else {
            return Vec::new();
        };
        self.regeometry(id, geometry, MaskEventKind::Moved)
            .unwrap_or_default()
    }

    pub fn translate_shape(&mut self, id: &str, dx: Micro, dy: Micro) -> Vec<TileId> {
        let Some(geometry) = self.masks.get(id).map(|m| m.geometry.translated(dx, dy)) else {
            return Vec::new();
        };
        self.regeometry(id, geometry, MaskEventKind::Moved)
            .unwrap_or_default()
    }

    /// Fits the mask to `size`. See [`MaskGeometry::resized`].
    pub fn resize_shape(&mut self, id: &str, size: Dimension) -> Result<Vec<TileId>, LayoutError> {
        let Some(geometry) = self.masks.get(id).map(|m| m.geometry.resized(size)) else {
            return Ok(Vec::new());
        };
        self.reshape_shape(id, geometry)
    }

    /// Replaces the geometry wholesale. The variant may change.
    pub fn reshape_shape(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
    ) -> Result<Vec<TileId>, LayoutError> {
        let Some(mask_id) = self.masks.get(id).map(|m| m.id.clone()) else {
            return Ok(Vec::new());
        };
        geometry.validate(&mask_id)?;
        Ok(self
            .regeometry(id, geometry, MaskEventKind::Resized)
            .unwrap_or_default())
    }

    /// Removes every mask.
    pub fn clear(&mut self) -> Vec<TileId> {
        let mut ids: Vec<MaskId> = self.masks.keys().cloned().collect();
        ids.sort();
        let mut touched = Vec::new();
        for id in ids {
            if let Some(shape) = self.detach(id.as_str()) {
                merge_ids(&mut touched, &shape.covered);
            }
        }
        self.notify(MaskEventKind::Cleared, None, touched.clone());
        touched
    }

    /// Swaps in a new grid and re-derives all masking on it.
    ///
    /// Returns every tile whose visibility differs from the previous grid.
    pub fn replace_grid(&mut self, grid: Grid) -> Vec<TileId> {
        let before: HashMap<TileId, bool> = self
            .grid
            .cells()
            .map(|c| (c.id.clone(), c.visible))
            .collect();

        self.grid = grid;
        self.tile_masks.clear();
        for cell in self.grid.cells_mut() {
            cell.masked_by.clear();
            cell.visible = true;
        }

        let pct = self.config.minimal_overlap_percent;
        for id in self.ordered_ids() {
            if let Some(shape) = self.masks.get_mut(&id) {
                shape.covered =
                    mask_cells(&mut self.grid, &mut self.tile_masks, &shape.id, &shape.geometry, pct);
            }
        }

        let changed: Vec<TileId> = self
            .grid
            .cells()
            .filter(|c| before.get(&c.id) != Some(&c.visible))
            .map(|c| c.id.clone())
            .collect();
        tracing::debug!(
            "Grid replaced under {} masks, {} tiles changed visibility",
            self.masks.len(),
            changed.len()
        );
        self.notify(MaskEventKind::Refreshed, None, changed.clone());
        changed
    }

    /// Re-evaluates the given cells against every active mask, e.g. after the
    /// cells moved. Returns the cells whose visibility changed.
    pub fn refresh_tiles(&mut self, ids: &[TileId]) -> Vec<TileId> {
        let pct = self.config.minimal_overlap_percent;
        let nominal = self.grid.tile_size();
        let ordered = self.ordered_ids();
        let mut changed = Vec::new();

        for tile_id in ids {
            let Some(cell) = self.grid.cell_mut(tile_id.as_str()) else {
                continue;
            };
            let was_visible = cell.visible;
            for mask_id in cell.masked_by.drain(..) {
                if let Some(shape) = self.masks.get_mut(&mask_id) {
                    shape.covered.retain(|t| t != tile_id);
                }
            }
            self.tile_masks.remove(tile_id);

            let bounds = cell.bounds(nominal);
            for mask_id in &ordered {
                let Some(shape) = self.masks.get_mut(mask_id) else {
                    continue;
                };
                if intersection::classify(&shape.geometry, bounds, pct).hides_tile() {
                    cell.masked_by.push(mask_id.clone());
                    shape.covered.push(tile_id.clone());
                    self.tile_masks
                        .entry(tile_id.clone())
                        .or_default()
                        .push(mask_id.clone());
                }
            }
            cell.visible = cell.masked_by.is_empty();
            if cell.visible != was_visible {
                changed.push(tile_id.clone());
            }
        }

        for shape in self.masks.values_mut() {
            let grid = &self.grid;
            shape
                .covered
                .sort_by_key(|t| grid.position_of(t.as_str()).unwrap_or((usize::MAX, usize::MAX)));
        }
        self.notify(MaskEventKind::Refreshed, None, ids.to_vec());
        changed
    }

    pub fn get_mask(&self, id: &str) -> Option<&MaskShape> {
        self.masks.get(id)
    }

    /// Active masks in creation order.
    pub fn masks(&self) -> Vec<&MaskShape> {
        let mut masks: Vec<&MaskShape> = self.masks.values().collect();
        masks.sort_by_key(|m| m.seq);
        masks
    }

    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    /// Masks covering a tile, in the order they were applied to it.
    pub fn get_masks_for_tile(&self, tile_id: &str) -> Vec<&MaskShape> {
        self.tile_masks
            .get(tile_id)
            .map(|ids| ids.iter().filter_map(|id| self.masks.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn tiles_for_mask(&self, id: &str) -> &[TileId] {
        self.masks.get(id).map_or(&[], |m| m.covered.as_slice())
    }

    pub fn get_masked_tile_count(&self) -> usize {
        self.grid.cells().filter(|c| c.is_masked()).count()
    }

    pub fn get_visible_tile_count(&self) -> usize {
        self.grid.visible_count()
    }

    pub fn is_tile_masked(&self, tile_id: &str) -> bool {
        self.tile_masks.get(tile_id).is_some_and(|m| !m.is_empty())
    }

    /// Masks whose region contains `point`, in creation order.
    pub fn masks_at_point(&self, point: Point) -> Vec<&MaskShape> {
        self.masks()
            .into_iter()
            .filter(|m| m.geometry.contains_point(point))
            .collect()
    }

    /// Classifies `geometry` against `cell` without changing anything.
    pub fn intersect(&self, geometry: &MaskGeometry, cell: &TileCell) -> Intersection {
        intersection::classify(
            geometry,
            cell.bounds(self.grid.tile_size()),
            self.config.minimal_overlap_percent,
        )
    }

    fn detach(&mut self, id: &str) -> Option<MaskShape> {
        let shape = self.masks.remove(id)?;
        unmask_cells(&mut self.grid, &mut self.tile_masks, &shape.id, &shape.covered);
        tracing::debug!("Mask {} detached from {} tiles", shape.id, shape.covered.len());
        Some(shape)
    }

    /// Un-mask at the old geometry, swap geometry, re-mask at the new one.
    fn regeometry(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
        kind: MaskEventKind,
    ) -> Option<Vec<TileId>> {
        let pct = self.config.minimal_overlap_percent;
        let shape = self.masks.get_mut(id)?;
        let old = std::mem::take(&mut shape.covered);
        unmask_cells(&mut self.grid, &mut self.tile_masks, &shape.id, &old);
        shape.geometry = geometry;
        shape.covered = mask_cells(&mut self.grid, &mut self.tile_masks, &shape.id, &shape.geometry, pct);

        let mut affected = old;
        merge_ids(&mut affected, &shape.covered);
        let mask_id = shape.id.clone();
        tracing::debug!(
            "Mask {} now covers {} tiles ({} touched)",
            mask_id,
            shape.covered.len(),
            affected.len()
        );
        self.notify(kind, Some(mask_id), affected.clone());
        Some(affected)
    }

    fn ordered_ids(&self) -> Vec<MaskId> {
        self.masks().into_iter().map(|m| m.id.clone()).collect()
    }

    fn visible_subset(&self, ids: &[TileId]) -> Vec<TileId> {
        ids.iter()
            .filter(|id| self.grid.cell(id.as_str()).is_some_and(|c| c.visible))
            .cloned()
            .collect()
    }

    fn notify(&mut self, kind: MaskEventKind, mask_id: Option<MaskId>, tile_ids: Vec<TileId>) {
        self.listeners.emit(&MaskEvent {
            kind,
            mask_id,
            tile_ids,
        });
    }
}

/// Hides every cell `geometry` covers and records the coverage.
fn mask_cells(
    grid: &mut Grid,
    tile_masks: &mut TileMasks,
    id: &MaskId,
    geometry: &MaskGeometry,
    minimal_percent: u8,
) -> Vec<TileId> {
    let nominal = grid.tile_size();
    let mut covered = Vec::new();
    for cell in grid.cells_mut() {
        let hit = intersection::classify(geometry, cell.bounds(nominal), minimal_percent);
        if !hit.hides_tile() {
            continue;
        }
        if !cell.masked_by.contains(id) {
            cell.masked_by.push(id.clone());
        }
        cell.visible = false;
        tile_masks.entry(cell.id.clone()).or_default().push(id.clone());
        covered.push(cell.id.clone());
    }
    covered
}

/// Reverses [`mask_cells`] for the cells a mask covered.
fn unmask_cells(grid: &mut Grid, tile_masks: &mut TileMasks, id: &MaskId, covered: &[TileId]) {
    for tile_id in covered {
        if let Some(cell) = grid.cell_mut(tile_id.as_str()) {
            cell.masked_by.retain(|m| m != id);
            cell.visible = cell.masked_by.is_empty();
        }
        if let Some(ids) = tile_masks.get_mut(tile_id) {
            ids.retain(|m| m != id);
            if ids.is_empty() {
                tile_masks.remove(tile_id);
            }
        }
    }
}

fn merge_ids(into: &mut Vec<TileId>, more: &[TileId]) {
    let seen: HashSet<TileId> = into.iter().cloned().collect();
    into.extend(more.iter().filter(|id| !seen.contains(*id)).cloned());
}
