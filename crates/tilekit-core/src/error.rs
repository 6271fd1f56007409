//! Error handling for TileKit
//!
//! Provides error types for every layer of the layout core:
//! - Unit errors (micro-unit arithmetic)
//! - Validation errors (layout input, reported per field)
//! - Layout errors (patterns, masks)
//! - Command errors (reported inside a failed command result)
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Micro-unit arithmetic error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Input was NaN or infinite
    #[error("Non-finite value: {value}")]
    NonFinite {
        /// The rejected value.
        value: f64,
    },

    /// Divisor was zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Square root of a negative length
    #[error("Square root of negative value {value}")]
    NegativeSqrt {
        /// The rejected raw micro-unit value.
        value: i64,
    },

    /// Result does not fit in the micro-unit range
    #[error("Arithmetic overflow")]
    Overflow,
}

/// Machine-readable validation failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    /// Value missing (zero where a size is required)
    Required,
    /// Value below the allowed minimum
    MinValue,
    /// Value above the allowed maximum
    MaxValue,
    /// Tile does not fit into the area
    TileLargerThanArea,
    /// Gap not strictly smaller than the smaller tile side
    GapLargerThanTile,
    /// Estimated cell count above the hard cap
    Overflow,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::TileLargerThanArea => "tile_larger_than_area",
            Self::GapLargerThanTile => "gap_larger_than_tile",
            Self::Overflow => "overflow",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    AreaWidth,
    AreaHeight,
    TileWidth,
    TileHeight,
    Gap,
    /// The input as a whole (cell-count cap)
    Layout,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AreaWidth => "area_width",
            Self::AreaHeight => "area_height",
            Self::TileWidth => "tile_width",
            Self::TileHeight => "tile_height",
            Self::Gap => "gap",
            Self::Layout => "layout",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected layout input field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message} ({code})")]
pub struct ValidationError {
    pub code: ValidationCode,
    pub field: InputField,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ValidationCode, field: InputField, message: impl Into<String>) -> Self {
        Self {
            code,
            field,
            message: message.into(),
        }
    }
}

/// Every field rejected by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Errors reported for one field.
    pub fn for_field(&self, field: InputField) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Layout engine error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Layout input rejected before any computation
    #[error("Invalid layout input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Arithmetic failure
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Pattern id not registered
    #[error("Unknown pattern: {id}")]
    UnknownPattern {
        /// The unregistered pattern id.
        id: String,
    },

    /// A mask with this id is already active
    #[error("Mask id already in use: {id}")]
    DuplicateMaskId {
        /// The conflicting mask id.
        id: String,
    },

    /// Mask geometry cannot cover anything
    #[error("Invalid geometry for mask {id}: {reason}")]
    InvalidMaskGeometry {
        /// The mask id.
        id: String,
        /// Why the geometry was rejected.
        reason: String,
    },
}

/// Reason a command could not be applied or reversed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Target tile or mask id no longer resolves
    #[error("Command target not found: {id}")]
    TargetMissing {
        /// The unresolved id.
        id: String,
    },

    /// Target tile is locked against editing
    #[error("Tile is locked: {id}")]
    TileLocked {
        /// The locked tile id.
        id: String,
    },

    /// Underlying layout operation failed
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl CommandError {
    pub fn target_missing(id: impl Into<String>) -> Self {
        Self::TargetMissing { id: id.into() }
    }
}

/// Main error type for TileKit
#[derive(Error, Debug)]
pub enum Error {
    /// Unit error
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an input validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Layout(LayoutError::Validation(_)))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Layout(LayoutError::Validation(errors))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
