//! # TileKit
//!
//! Tile layout engine for floors and walls:
//! - Integer micro-unit arithmetic, no floating-point drift
//! - Grid generation with full tiles, cut pieces and edge alignment
//! - 15 laying patterns (running bond, herringbone, basket weave, ...)
//! - Rectangle, circle and polygon masks for fixtures and cut-outs
//! - Undo/redo with command merging and atomic groups
//!
//! ## Architecture
//!
//! TileKit is organized as a workspace with multiple crates:
//!
//! 1. **tilekit-core** - Units, geometry, errors, change notification
//! 2. **tilekit-layout** - Grid, pattern, masking and history engines
//! 3. **tilekit-settings** - Persisted engine configuration
//! 4. **tilekit** - Facade library and the `tilekit` command line

pub mod request;

pub use tilekit_layout as layout;
pub use tilekit_settings as settings;

pub use tilekit_core::{
    CommandError, Dimension, Error, LayoutError, Micro, Point, Rect, Result, UnitError,
    ValidationError, ValidationErrors,
};

pub use tilekit_layout::{
    Command, CommandResult, GridEngine, HistoryConfig, HistoryEngine, LayoutCommand,
    LayoutEditor, LayoutInput, LayoutResult, LayoutSummary, MaskGeometry, MaskShape,
    MaskingEngine, PatternEngine, PatternRegistry, StartLine, TileLayout,
};

pub use tilekit_settings::{Config, LayoutDefaults, SettingsError};

pub use request::{build_layout, report, LayoutReport, LayoutRequest, MaskReport, MaskRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so stdout stays machine readable
/// - RUST_LOG environment variable support, `info` otherwise
/// - Target, level, thread and line information
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
