//! Narrow mask store that mask commands are written against.

use super::engine::MaskingEngine;
use super::shape::{MaskGeometry, MaskShape};
use crate::grid::TileId;
use tilekit_core::{LayoutError, Micro};

/// Mask storage operations needed to apply and reverse mask edits.
///
/// `None` means the mask id does not resolve.
pub trait MaskRepository {
    /// Activates `shape`, recomputing its coverage. Returns the covered tiles.
    fn insert_mask(&mut self, shape: MaskShape) -> Result<Vec<TileId>, LayoutError>;

    /// Deactivates a mask and returns it with the tiles it covered.
    fn take_mask(&mut self, id: &str) -> Option<MaskShape>;

    /// Returns every tile whose coverage changed.
    fn translate_mask(&mut self, id: &str, dx: Micro, dy: Micro) -> Option<Vec<TileId>>;

    /// Replaces the geometry. Returns every tile whose coverage changed.
    fn reshape_mask(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
    ) -> Result<Option<Vec<TileId>>, LayoutError>;

    fn mask_geometry(&self, id: &str) -> Option<&MaskGeometry>;
}

impl MaskRepository for MaskingEngine {
    fn insert_mask(&mut self, shape: MaskShape) -> Result<Vec<TileId>, LayoutError> {
        self.insert_shape(shape)
    }

    fn take_mask(&mut self, id: &str) -> Option<MaskShape> {
        self.take_shape(id)
    }

    fn translate_mask(&mut self, id: &str, dx: Micro, dy: Micro) -> Option<Vec<TileId>> {
        self.get_mask(id)?;
        Some(self.translate_shape(id, dx, dy))
    }

    fn reshape_mask(
        &mut self,
        id: &str,
        geometry: MaskGeometry,
    ) -> Result<Option<Vec<TileId>>, LayoutError> {
        if self.get_mask(id).is_none() {
            return Ok(None);
        }
        self.reshape_shape(id, geometry).map(Some)
    }

    fn mask_geometry(&self, id: &str) -> Option<&MaskGeometry> {
        self.get_mask(id).map(|m| &m.geometry)
    }
}
