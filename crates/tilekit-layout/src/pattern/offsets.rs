//! Per-cell offset functions for the built-in patterns.
//!
//! Every function is pure: the offset of a cell depends only on its grid
//! coordinates and the nominal tile geometry.

use crate::grid::Rotation;
use serde::{Deserialize, Serialize};
use tilekit_core::Micro;

/// Inputs to an offset function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetContext {
    pub row: usize,
    pub col: usize,
    pub tile_width: Micro,
    pub tile_height: Micro,
    pub gap: Micro,
}

/// Translation, rotation and dimension swap applied to one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOffset {
    pub dx: Micro,
    pub dy: Micro,
    pub rotation: Rotation,
    pub swap_dimensions: bool,
}

impl PatternOffset {
    pub const NONE: PatternOffset = PatternOffset {
        dx: Micro::ZERO,
        dy: Micro::ZERO,
        rotation: Rotation::Deg0,
        swap_dimensions: false,
    };

    pub fn shift(dx: Micro, dy: Micro) -> Self {
        Self {
            dx,
            dy,
            ..Self::NONE
        }
    }

    /// Quarter turn with exchanged sides.
    pub fn turned() -> Self {
        Self {
            rotation: Rotation::Deg90,
            swap_dimensions: true,
            ..Self::NONE
        }
    }

    fn with_shift(mut self, dx: Micro, dy: Micro) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }
}

pub type OffsetFn = fn(&OffsetContext) -> PatternOffset;

fn is_odd(n: usize) -> bool {
    n % 2 == 1
}

/// `floor(size * index / parts)`.
fn fraction(size: Micro, index: usize, parts: i64) -> Micro {
    Micro::new((size.raw() * index as i64).div_euclid(parts))
}

pub fn no_offset(_: &OffsetContext) -> PatternOffset {
    PatternOffset::NONE
}

pub fn rotated_stack(_: &OffsetContext) -> PatternOffset {
    PatternOffset::turned()
}

/// Odd rows shift by half a tile width.
pub fn half_offset_rows(ctx: &OffsetContext) -> PatternOffset {
    if is_odd(ctx.row) {
        PatternOffset::shift(ctx.tile_width.half(), Micro::ZERO)
    } else {
        PatternOffset::NONE
    }
}

/// Odd columns shift by half a tile height.
pub fn half_offset_cols(ctx: &OffsetContext) -> PatternOffset {
    if is_odd(ctx.col) {
        PatternOffset::shift(Micro::ZERO, ctx.tile_height.half())
    } else {
        PatternOffset::NONE
    }
}

/// 0, 1/3, 2/3 of a tile width, repeating every three rows.
pub fn third_offset_rows(ctx: &OffsetContext) -> PatternOffset {
    PatternOffset::shift(fraction(ctx.tile_width, ctx.row % 3, 3), Micro::ZERO)
}

pub fn third_offset_cols(ctx: &OffsetContext) -> PatternOffset {
    PatternOffset::shift(Micro::ZERO, fraction(ctx.tile_height, ctx.col % 3, 3))
}

/// Each row steps a quarter tile further, wrapping at one tile width.
pub fn diagonal_running(ctx: &OffsetContext) -> PatternOffset {
    let width = ctx.tile_width.raw();
    if width == 0 {
        return PatternOffset::NONE;
    }
    let step = fraction(ctx.tile_width, ctx.row, 4).raw().rem_euclid(width);
    PatternOffset::shift(Micro::new(step), Micro::ZERO)
}

/// Checkerboard quarter turns on a running bond, without swapping sides.
pub fn diagonal_running_point(ctx: &OffsetContext) -> PatternOffset {
    let rotation = if is_odd(ctx.row + ctx.col) {
        Rotation::Deg90
    } else {
        Rotation::Deg0
    };
    PatternOffset {
        rotation,
        ..half_offset_rows(ctx)
    }
}

/// Checkerboard of quarter-turned tiles.
pub fn straight_herringbone(ctx: &OffsetContext) -> PatternOffset {
    if is_odd(ctx.row + ctx.col) {
        PatternOffset::turned()
    } else {
        PatternOffset::NONE
    }
}

/// 2x2 interlocking block; turned tiles are offset by one tile height.
pub fn traditional_herringbone(ctx: &OffsetContext) -> PatternOffset {
    let h = ctx.tile_height;
    match (ctx.row % 2, ctx.col % 2) {
        (0, 0) => PatternOffset::NONE,
        (0, _) => PatternOffset::turned().with_shift(Micro::ZERO, h),
        (_, 0) => PatternOffset::turned().with_shift(h, Micro::ZERO),
        _ => PatternOffset::shift(h, h),
    }
}

/// 2x2 super-blocks alternate between a horizontal and a vertical pair.
pub fn basket_weave(ctx: &OffsetContext) -> PatternOffset {
    let parity = (ctx.row / 2 + ctx.col / 2) % 2;
    if parity == 0 {
        return PatternOffset::NONE;
    }
    let k = (ctx.col % 2) as i64;
    let dx = (ctx.tile_height - ctx.tile_width).times(k);
    PatternOffset::turned().with_shift(dx, Micro::ZERO)
}

/// Rotation advances a quarter turn per diagonal step.
pub fn quarter_turn(ctx: &OffsetContext) -> PatternOffset {
    let rotation = Rotation::from_quarter_turns(((ctx.row + ctx.col) % 4) as i64);
    PatternOffset {
        rotation,
        swap_dimensions: rotation.is_quarter_turn(),
        ..PatternOffset::NONE
    }
}
