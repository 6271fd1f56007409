//! Pattern registry: stable ids, display names and capability flags.

use super::offsets::{self, OffsetContext, OffsetFn, PatternOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use tilekit_core::{Dimension, LayoutError};

pub const LINEAR_SQUARE: &str = "LINEAR_SQUARE";
pub const LINEAR_RECTANGULAR: &str = "LINEAR_RECTANGULAR";
pub const STACK_BOND: &str = "STACK_BOND";
pub const STACK_BOND_VERTICAL: &str = "STACK_BOND_VERTICAL";
pub const RUNNING_BOND_SQUARE: &str = "RUNNING_BOND_SQUARE";
pub const RUNNING_BOND_RECTANGULAR: &str = "RUNNING_BOND_RECTANGULAR";
pub const RUNNING_BOND_VERTICAL: &str = "RUNNING_BOND_VERTICAL";
pub const THIRD_OFFSET: &str = "THIRD_OFFSET";
pub const THIRD_OFFSET_VERTICAL: &str = "THIRD_OFFSET_VERTICAL";
pub const DIAGONAL_RUNNING: &str = "DIAGONAL_RUNNING";
pub const DIAGONAL_RUNNING_POINT: &str = "DIAGONAL_RUNNING_POINT";
pub const STRAIGHT_HERRINGBONE: &str = "STRAIGHT_HERRINGBONE";
pub const TRADITIONAL_HERRINGBONE: &str = "TRADITIONAL_HERRINGBONE";
pub const BASKET_WEAVE: &str = "BASKET_WEAVE";
pub const QUARTER_TURN: &str = "QUARTER_TURN";

/// Pattern family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    NoOffset,
    HalfOffset,
    ThirdOffset,
    RotatedStack,
    Diagonal,
    Herringbone,
    BasketWeave,
    Rotation,
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternCategory::NoOffset => "no offset",
            PatternCategory::HalfOffset => "half offset",
            PatternCategory::ThirdOffset => "third offset",
            PatternCategory::RotatedStack => "rotated stack",
            PatternCategory::Diagonal => "diagonal",
            PatternCategory::Herringbone => "herringbone",
            PatternCategory::BasketWeave => "basket weave",
            PatternCategory::Rotation => "rotation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalizedName {
    pub en: &'static str,
    pub de: &'static str,
}

impl LocalizedName {
    /// Name for a language tag such as `"de"` or `"de-AT"`, English otherwise.
    pub fn for_locale(&self, locale: &str) -> &'static str {
        if locale.to_ascii_lowercase().starts_with("de") {
            self.de
        } else {
            self.en
        }
    }
}

/// A registered pattern.
#[derive(Clone, Copy)]
pub struct PatternDefinition {
    pub id: &'static str,
    pub names: LocalizedName,
    pub category: PatternCategory,
    /// Only meaningful with non-square tiles.
    pub requires_rectangular: bool,
    /// Neighbouring cells receive different offsets or rotations.
    pub alternating: bool,
    offset: OffsetFn,
}

impl PatternDefinition {
    pub const fn new(
        id: &'static str,
        names: LocalizedName,
        category: PatternCategory,
        requires_rectangular: bool,
        alternating: bool,
        offset: OffsetFn,
    ) -> Self {
        Self {
            id,
            names,
            category,
            requires_rectangular,
            alternating,
            offset,
        }
    }

    pub fn offset(&self, ctx: &OffsetContext) -> PatternOffset {
        (self.offset)(ctx)
    }
}

impl fmt::Debug for PatternDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDefinition")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("requires_rectangular", &self.requires_rectangular)
            .field("alternating", &self.alternating)
            .finish()
    }
}

/// UI hint for a pattern that does not suit the chosen tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityWarning {
    pub pattern_id: String,
    pub message: String,
}

const fn names(en: &'static str, de: &'static str) -> LocalizedName {
    LocalizedName { en, de }
}

#[rustfmt::skip]
const BUILTIN: [PatternDefinition; 15] = {
    use PatternCategory::*;
    [
        PatternDefinition::new(LINEAR_SQUARE, names("Linear (square)", "Linear (quadratisch)"), NoOffset, false, false, offsets::no_offset),
        PatternDefinition::new(LINEAR_RECTANGULAR, names("Linear (rectangular)", "Linear (rechteckig)"), NoOffset, true, false, offsets::no_offset),
        PatternDefinition::new(STACK_BOND, names("Stack bond", "Kreuzfuge"), NoOffset, false, false, offsets::no_offset),
        PatternDefinition::new(STACK_BOND_VERTICAL, names("Vertical stack bond", "Kreuzfuge hochkant"), RotatedStack, true, false, offsets::rotated_stack),
        PatternDefinition::new(RUNNING_BOND_SQUARE, names("Running bond (square)", "Halbverband (quadratisch)"), HalfOffset, false, true, offsets::half_offset_rows),
        PatternDefinition::new(RUNNING_BOND_RECTANGULAR, names("Running bond (rectangular)", "Halbverband (rechteckig)"), HalfOffset, true, true, offsets::half_offset_rows),
        PatternDefinition::new(RUNNING_BOND_VERTICAL, names("Vertical running bond", "Halbverband hochkant"), HalfOffset, true, true, offsets::half_offset_cols),
        PatternDefinition::new(THIRD_OFFSET, names("Third offset", "Drittelverband"), ThirdOffset, true, true, offsets::third_offset_rows),
        PatternDefinition::new(THIRD_OFFSET_VERTICAL, names("Vertical third offset", "Drittelverband hochkant"), ThirdOffset, true, true, offsets::third_offset_cols),
        PatternDefinition::new(DIAGONAL_RUNNING, names("Diagonal running bond", "Diagonaler Verband"), Diagonal, false, true, offsets::diagonal_running),
        PatternDefinition::new(DIAGONAL_RUNNING_POINT, names("Diagonal running bond (point)", "Diagonaler Verband (Spitze)"), Diagonal, false, true, offsets::diagonal_running_point),
        PatternDefinition::new(STRAIGHT_HERRINGBONE, names("Straight herringbone", "Gerades Fischgrät"), Herringbone, true, true, offsets::straight_herringbone),
        PatternDefinition::new(TRADITIONAL_HERRINGBONE, names("Traditional herringbone", "Klassisches Fischgrät"), Herringbone, true, true, offsets::traditional_herringbone),
        PatternDefinition::new(BASKET_WEAVE, names("Basket weave", "Flechtverband"), BasketWeave, true, true, offsets::basket_weave),
        PatternDefinition::new(QUARTER_TURN, names("Quarter turn", "Vierteldrehung"), Rotation, false, true, offsets::quarter_turn),
    ]
};

/// Lookup table of patterns in registration order.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<PatternDefinition>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self {
            patterns: BUILTIN.to_vec(),
        }
    }
}

impl PatternRegistry {
    /// Registry with the 15 built-in patterns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Adds a pattern, replacing any previous definition with the same id in place.
    pub fn register(&mut self, definition: PatternDefinition) -> Option<PatternDefinition> {
        match self.patterns.iter_mut().find(|p| p.id == definition.id) {
            Some(slot) => Some(std::mem::replace(slot, definition)),
            None => {
                self.patterns.push(definition);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<&PatternDefinition, LayoutError> {
        self.patterns
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| LayoutError::UnknownPattern { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.patterns.iter().any(|p| p.id == id)
    }

    pub fn list(&self) -> &[PatternDefinition] {
        &self.patterns
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.iter().map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Warns when a rectangular-only pattern is chosen for a square tile.
    pub fn compatibility(
        &self,
        id: &str,
        tile: Dimension,
    ) -> Result<Option<CompatibilityWarning>, LayoutError> {
        let pattern = self.get(id)?;
        if pattern.requires_rectangular && tile.is_square() {
            return Ok(Some(CompatibilityWarning {
                pattern_id: pattern.id.to_string(),
                message: format!("{} needs a rectangular tile", pattern.names.en),
            }));
        }
        Ok(None)
    }
}
