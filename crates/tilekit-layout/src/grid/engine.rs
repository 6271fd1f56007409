//! Grid generation.
//!
//! Each axis is planned independently: the maximal number of whole tiles that
//! fit, the remainder, and how the remainder is split between the two edges
//! according to the start line. The grid is the cartesian product of the two
//! axis plans.

use super::input::{LayoutInput, StartLine, AREA_RANGE_MM, GAP_RANGE_MM, MAX_CELLS, TILE_RANGE_MM};
use super::result::{LayoutResult, PieceInfo, Remainders};
use super::{CutClass, Grid, PieceType, TileCell, TilePiece};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tilekit_core::units::{self, area_to_square_metres};
use tilekit_core::{
    Dimension, InputField, LayoutError, Micro, Point, UnitError, ValidationCode,
    ValidationError, ValidationErrors,
};

/// Area ratio, in percent, from which a cut piece counts as large.
pub const LARGE_PIECE_THRESHOLD_PERCENT: i128 = 50;

/// Grid engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge cuts smaller than this are dropped and the row treated as fitting exactly.
    pub min_edge_cell: Micro,
    /// Hard cap on generated cells.
    pub max_cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_edge_cell: Micro::from_mm(1),
            max_cells: MAX_CELLS,
        }
    }
}

/// One cell position along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSegment {
    pub offset: Micro,
    pub size: Micro,
    pub full: bool,
}

/// Layout of one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisPlan {
    /// Whole tiles that fit.
    pub full_count: i64,
    /// `n * tile + (n - 1) * gap`.
    pub used: Micro,
    /// `area - used`.
    pub remainder: Micro,
    /// Remainder share at the near edge (left/top).
    pub near: Micro,
    /// Remainder share at the far edge (right/bottom).
    pub far: Micro,
    /// Materialised cells in order, edge cuts included.
    pub segments: Vec<AxisSegment>,
}

impl AxisPlan {
    pub fn cell_count(&self) -> usize {
        self.segments.len()
    }
}

/// Plans one axis.
///
/// `n = floor((area + gap) / (tile + gap))` is the largest `n` with
/// `n * tile + (n - 1) * gap <= area`. An edge share includes the joint to the
/// neighbouring full tile, so the cut piece itself is `share - gap`; cuts
/// below `min_edge` are not materialised.
pub fn plan_axis(
    area: Micro,
    tile: Micro,
    gap: Micro,
    start: StartLine,
    min_edge: Micro,
) -> Result<AxisPlan, UnitError> {
    let pitch = units::add(tile, gap)?;
    let full_count = units::div_floor(units::add(area, gap)?, pitch)?.max(0);
    let used = if full_count == 0 {
        Micro::ZERO
    } else {
        units::add(
            units::mul_int(tile, full_count)?,
            units::mul_int(gap, full_count - 1)?,
        )?
    };
    let remainder = units::sub(area, used)?;

    let (near, far) = match start {
        StartLine::Start => (Micro::ZERO, remainder),
        StartLine::End => (remainder, Micro::ZERO),
        StartLine::Center => {
            let near = units::div_int(remainder, 2)?;
            (near, remainder - near)
        }
    };

    let joint = if full_count > 0 { gap } else { Micro::ZERO };
    let edge_cut = |share: Micro| {
        let size = share - joint;
        (size > Micro::ZERO && size >= min_edge).then_some(size)
    };

    let mut segments = Vec::with_capacity(full_count as usize + 2);
    if let Some(size) = edge_cut(near) {
        segments.push(AxisSegment {
            offset: Micro::ZERO,
            size,
            full: false,
        });
    }
    for i in 0..full_count {
        segments.push(AxisSegment {
            offset: near + units::mul_int(pitch, i)?,
            size: tile,
            full: true,
        });
    }
    if let Some(size) = edge_cut(far) {
        segments.push(AxisSegment {
            offset: near + used + joint,
            size,
            full: false,
        });
    }

    Ok(AxisPlan {
        full_count,
        used,
        remainder,
        near,
        far,
        segments,
    })
}

/// Classifies a piece against the nominal tile size.
///
/// Exact nominal size is `Full`. Otherwise the truncated integer area ratio
/// `cut * 100 / full` decides: 50 and above is `Large`, below is `Small`.
pub fn classify_piece_type(size: Dimension, nominal: Dimension) -> PieceType {
    if size == nominal {
        return PieceType::Full;
    }
    if area_ratio_percent(size, nominal) >= LARGE_PIECE_THRESHOLD_PERCENT as u32 {
        PieceType::Large
    } else {
        PieceType::Small
    }
}

/// Truncated `size / nominal` area ratio in percent.
pub fn area_ratio_percent(size: Dimension, nominal: Dimension) -> u32 {
    let full_area = nominal.area();
    if full_area <= 0 {
        return 0;
    }
    let ratio = size.area() * 100 / full_area;
    u32::try_from(ratio.max(0)).unwrap_or(u32::MAX)
}

/// Turns a [`LayoutInput`] into a grid of tile cells plus aggregate counts.
#[derive(Debug, Clone, Default)]
pub struct GridEngine {
    config: GridConfig,
}

impl GridEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Checks every field and returns all violations at once.
    pub fn validate(&self, input: &LayoutInput) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        let area_w_ok = check_side(&mut errors, InputField::AreaWidth, input.area_width, &AREA_RANGE_MM);
        let area_h_ok = check_side(&mut errors, InputField::AreaHeight, input.area_height, &AREA_RANGE_MM);
        let tile_w_ok = check_side(&mut errors, InputField::TileWidth, input.tile_width, &TILE_RANGE_MM);
        let tile_h_ok = check_side(&mut errors, InputField::TileHeight, input.tile_height, &TILE_RANGE_MM);
        let gap_ok = check_gap(&mut errors, input.gap);

        if area_w_ok && tile_w_ok && input.tile_width > input.area_width {
            errors.push(ValidationError::new(
                ValidationCode::TileLargerThanArea,
                InputField::TileWidth,
                format!(
                    "tile width {} exceeds area width {}",
                    input.tile_width, input.area_width
                ),
            ));
        }
        if area_h_ok && tile_h_ok && input.tile_height > input.area_height {
            errors.push(ValidationError::new(
                ValidationCode::TileLargerThanArea,
                InputField::TileHeight,
                format!(
                    "tile height {} exceeds area height {}",
                    input.tile_height, input.area_height
                ),
            ));
        }
        if gap_ok && tile_w_ok && tile_h_ok {
            let smaller = input.tile().min_side();
            if input.gap >= smaller {
                errors.push(ValidationError::new(
                    ValidationCode::GapLargerThanTile,
                    InputField::Gap,
                    format!("gap {} must be smaller than the tile side {}", input.gap, smaller),
                ));
            }
        }

        if errors.is_empty() {
            if let Err(err) = self.check_cell_count(input) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Generates the layout. Fails before computing anything if the input is invalid.
    pub fn generate(&self, input: &LayoutInput) -> Result<LayoutResult, LayoutError> {
        self.validate(input)?;

        let min_edge = self.config.min_edge_cell;
        let x_plan = plan_axis(input.area_width, input.tile_width, input.gap, input.start_x, min_edge)?;
        let y_plan = plan_axis(input.area_height, input.tile_height, input.gap, input.start_y, min_edge)?;
        let nominal = input.tile();

        let mut full_tiles = 0;
        let mut large_pieces = 0;
        let mut small_pieces = 0;
        let mut large_piece = None;
        let mut small_piece = None;
        let mut covered_area: i128 = 0;

        let mut rows = Vec::with_capacity(y_plan.cell_count());
        for (r, seg_y) in y_plan.segments.iter().enumerate() {
            let mut row = Vec::with_capacity(x_plan.cell_count());
            for (c, seg_x) in x_plan.segments.iter().enumerate() {
                let size = Dimension::new(seg_x.size, seg_y.size);
                let position = Point::new(seg_x.offset, seg_y.offset);
                covered_area += size.area();

                let piece = match classify_piece_type(size, nominal) {
                    PieceType::Full => {
                        full_tiles += 1;
                        TilePiece::Full
                    }
                    PieceType::Large => {
                        large_pieces += 1;
                        large_piece.get_or_insert_with(|| PieceInfo::new(size, nominal));
                        TilePiece::cut(CutClass::Large, size)
                    }
                    _ => {
                        small_pieces += 1;
                        small_piece.get_or_insert_with(|| PieceInfo::new(size, nominal));
                        TilePiece::cut(CutClass::Small, size)
                    }
                };
                row.push(TileCell::new(r, c, position, piece));
            }
            rows.push(row);
        }

        let grid = Grid::new(rows, nominal, input.gap);
        let total_area = input.area().area();

        tracing::debug!(
            columns = x_plan.cell_count(),
            rows = y_plan.cell_count(),
            full_tiles,
            large_pieces,
            small_pieces,
            "Generated layout grid"
        );

        Ok(LayoutResult {
            input: *input,
            total_tiles: grid.cell_count(),
            full_tiles,
            large_pieces,
            small_pieces,
            columns: x_plan.cell_count(),
            rows: y_plan.cell_count(),
            large_piece,
            small_piece,
            remainders: Remainders {
                left: x_plan.near,
                right: x_plan.far,
                top: y_plan.near,
                bottom: y_plan.far,
            },
            grid,
            total_area_m2: area_to_square_metres(total_area),
            tile_area_m2: area_to_square_metres(covered_area),
        })
    }

    fn check_cell_count(&self, input: &LayoutInput) -> Result<(), ValidationError> {
        let min_edge = self.config.min_edge_cell;
        let overflow = |detail: String| {
            ValidationError::new(ValidationCode::Overflow, InputField::Layout, detail)
        };
        let x = plan_axis(input.area_width, input.tile_width, input.gap, input.start_x, min_edge)
            .map_err(|e| overflow(e.to_string()))?;
        let y = plan_axis(input.area_height, input.tile_height, input.gap, input.start_y, min_edge)
            .map_err(|e| overflow(e.to_string()))?;
        let cells = x.cell_count().saturating_mul(y.cell_count());
        if cells > self.config.max_cells {
            return Err(overflow(format!(
                "layout would produce {} cells, the limit is {}",
                cells, self.config.max_cells
            )));
        }
        Ok(())
    }
}

fn check_side(
    errors: &mut Vec<ValidationError>,
    field: InputField,
    value: Micro,
    range: &RangeInclusive<i64>,
) -> bool {
    let min = Micro::from_mm(*range.start());
    let max = Micro::from_mm(*range.end());
    let error = if value.is_zero() {
        Some(ValidationError::new(ValidationCode::Required, field, "value is required"))
    } else if value < min {
        Some(ValidationError::new(
            ValidationCode::MinValue,
            field,
            format!("must be at least {}", min),
        ))
    } else if value > max {
        Some(ValidationError::new(
            ValidationCode::MaxValue,
            field,
            format!("must be at most {}", max),
        ))
    } else {
        None
    };
    match error {
        Some(err) => {
            errors.push(err);
            false
        }
        None => true,
    }
}

fn check_gap(errors: &mut Vec<ValidationError>, gap: Micro) -> bool {
    let min = Micro::from_mm(*GAP_RANGE_MM.start());
    let max = Micro::from_mm(*GAP_RANGE_MM.end());
    if gap < min {
        errors.push(ValidationError::new(
            ValidationCode::MinValue,
            InputField::Gap,
            format!("must be at least {}", min),
        ));
        false
    } else if gap > max {
        errors.push(ValidationError::new(
            ValidationCode::MaxValue,
            InputField::Gap,
            format!("must be at most {}", max),
        ));
        false
    } else {
        true
    }
}
