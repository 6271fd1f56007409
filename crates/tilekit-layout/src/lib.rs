//! # TileKit Layout
//!
//! Tile layout engines: grid generation, laying patterns, non-destructive
//! masking and undo/redo, plus the document and editor that wire them
//! together.
//!
//! ## Core Components
//!
//! - **Grid**: fits whole tiles into an area and distributes the remainder to
//!   cut pieces at the edges, all in integer micrometres
//! - **Patterns**: fifteen laying patterns expressed as per-cell offsets,
//!   rotations and side swaps over the base grid
//! - **Masking**: rectangles, circles and polygons that hide tiles without
//!   deleting them
//! - **History**: generic command stacks with merging, grouping and bounded
//!   depth
//!
//! ## Architecture
//!
//! ```text
//! LayoutEditor (undoable session)
//!   ├── HistoryEngine<LayoutCommand>
//!   └── TileLayout (document)
//!         ├── LayoutResult (generation output)
//!         ├── PatternEngine (registry + apply)
//!         └── MaskingEngine (owns the live grid)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tilekit_layout::{EngineConfig, LayoutEditor, LayoutInput, TileLayout};
//!
//! let input = LayoutInput::from_mm((3000, 2000), (600, 300), 3);
//! let layout = TileLayout::generate(&input, "RUNNING_BOND_RECTANGULAR", &EngineConfig::default())?;
//! let mut editor = LayoutEditor::new(layout, Default::default());
//! editor.rotate_tile("tile_0_0", 1);
//! editor.undo();
//! ```

pub mod commands;
pub mod editor;
pub mod grid;
pub mod history;
pub mod layout;
pub mod masking;
pub mod pattern;

pub use commands::LayoutCommand;
pub use editor::LayoutEditor;
pub use grid::{
    Grid, GridConfig, GridEngine, LayoutInput, LayoutResult, LayoutSummary, PieceType, Rotation,
    StartLine, TileCell, TileId, TilePiece,
};
pub use history::{Command, CommandResult, HistoryConfig, HistoryEngine, HistoryEvent};
pub use layout::{EngineConfig, TileLayout};
pub use masking::{
    IntersectionType, MaskEvent, MaskGeometry, MaskId, MaskRepository, MaskShape, MaskingConfig,
    MaskingEngine,
};
pub use pattern::{ApplyPatternOptions, PatternConfig, PatternEngine, PatternRegistry};
