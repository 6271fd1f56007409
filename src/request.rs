//! Layout requests as accepted by the `tilekit` command line.
//!
//! Requests carry display millimetres as floats. They are converted to
//! micro-units once, on entry, and everything downstream is integer.

use serde::{Deserialize, Serialize};
use tilekit_core::units::to_micro;
use tilekit_core::{LayoutError, Point, Rect, UnitError};
use tilekit_layout::grid::{LayoutInput, StartLine};
use tilekit_layout::{
    LayoutSummary, MaskGeometry, MaskRepository, MaskShape, TileLayout,
};
use tilekit_settings::{Config, LayoutDefaults};

/// One surface to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub area_width: f64,
    pub area_height: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    /// Falls back to the configured default joint width.
    pub gap: Option<f64>,
    pub start_x: Option<StartLine>,
    pub start_y: Option<StartLine>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub masks: Vec<MaskRequest>,
}

/// Excluded region, in display millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MaskRequest {
    Rectangle {
        id: String,
        label: Option<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        id: String,
        label: Option<String>,
        cx: f64,
        cy: f64,
        radius: f64,
    },
    Polygon {
        id: String,
        label: Option<String>,
        points: Vec<[f64; 2]>,
    },
}

fn point(x: f64, y: f64) -> Result<Point, UnitError> {
    Ok(Point::new(to_micro(x)?, to_micro(y)?))
}

impl MaskRequest {
    pub fn id(&self) -> &str {
        match self {
            Self::Rectangle { id, .. } | Self::Circle { id, .. } | Self::Polygon { id, .. } => id,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Rectangle { label, .. }
            | Self::Circle { label, .. }
            | Self::Polygon { label, .. } => label.as_deref(),
        }
    }

    pub fn geometry(&self) -> Result<MaskGeometry, UnitError> {
        Ok(match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => MaskGeometry::rectangle(Rect::from_xywh(
                to_micro(*x)?,
                to_micro(*y)?,
                to_micro(*width)?,
                to_micro(*height)?,
            )),
            Self::Circle { cx, cy, radius, .. } => {
                MaskGeometry::circle(point(*cx, *cy)?, to_micro(*radius)?)
            }
            Self::Polygon { points, .. } => MaskGeometry::polygon(
                points
                    .iter()
                    .map(|[x, y]| point(*x, *y))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }

    fn to_shape(&self) -> Result<MaskShape, UnitError> {
        let mut shape = MaskShape::new(self.id(), self.geometry()?);
        shape.label = self.label().map(str::to_string);
        Ok(shape)
    }
}

impl LayoutRequest {
    /// Grid input with omitted fields taken from `defaults`.
    pub fn to_input(&self, defaults: &LayoutDefaults) -> Result<LayoutInput, UnitError> {
        Ok(LayoutInput {
            area_width: to_micro(self.area_width)?,
            area_height: to_micro(self.area_height)?,
            tile_width: to_micro(self.tile_width)?,
            tile_height: to_micro(self.tile_height)?,
            gap: to_micro(self.gap.unwrap_or(defaults.gap_mm))?,
            start_x: self.start_x.unwrap_or(defaults.start_x),
            start_y: self.start_y.unwrap_or(defaults.start_y),
        })
    }

    pub fn pattern_id<'a>(&'a self, defaults: &'a LayoutDefaults) -> &'a str {
        self.pattern.as_deref().unwrap_or(&defaults.pattern)
    }
}

/// Per-mask line of a [`LayoutReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskReport {
    pub id: String,
    pub label: Option<String>,
    pub kind: &'static str,
    pub covered_tiles: usize,
}

/// What the command line prints for a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub pattern: String,
    pub summary: LayoutSummary,
    pub visible_tiles: usize,
    pub masked_tiles: usize,
    pub masks: Vec<MaskReport>,
    pub warnings: Vec<String>,
}

/// Generates the layout, applies the pattern and adds every mask in order.
pub fn build_layout(request: &LayoutRequest, config: &Config) -> Result<TileLayout, LayoutError> {
    let input = request.to_input(&config.defaults)?;
    let mut layout = TileLayout::generate(
        &input,
        request.pattern_id(&config.defaults),
        &config.engine_config(),
    )?;
    for mask in &request.masks {
        let covered = layout.insert_mask(mask.to_shape()?)?;
        tracing::debug!("Mask {} covers {} tiles", mask.id(), covered.len());
    }
    Ok(layout)
}

pub fn report(layout: &TileLayout) -> LayoutReport {
    let masking = layout.masking();
    let tile = layout.result().input.tile();
    let warnings = layout
        .patterns()
        .compatibility(layout.pattern_id(), tile)
        .ok()
        .flatten()
        .map(|warning| warning.message)
        .into_iter()
        .collect();

    LayoutReport {
        pattern: layout.pattern_id().to_string(),
        summary: layout.result().summary(),
        visible_tiles: masking.get_visible_tile_count(),
        masked_tiles: masking.get_masked_tile_count(),
        masks: masking
            .masks()
            .into_iter()
            .map(|shape| MaskReport {
                id: shape.id.to_string(),
                label: shape.label.clone(),
                kind: shape.geometry.kind(),
                covered_tiles: shape.covered.len(),
            })
            .collect(),
        warnings,
    }
}
