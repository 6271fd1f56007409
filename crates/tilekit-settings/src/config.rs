//! Configuration management for TileKit
//!
//! Provides configuration file handling and validation. Supports JSON and TOML
//! file formats; the default location is platform specific.
//!
//! Configuration is organized into sections:
//! - Grid generation limits
//! - Masking thresholds
//! - Undo history depth and merging
//! - Defaults applied to layout requests that omit them

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tilekit_layout::grid::{GridConfig, StartLine, GAP_RANGE_MM};
use tilekit_layout::pattern::registry::LINEAR_SQUARE;
use tilekit_layout::{EngineConfig, HistoryConfig, MaskingConfig, PatternRegistry};

/// Defaults for layout requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDefaults {
    /// Joint width in mm
    pub gap_mm: f64,
    /// Horizontal start line
    pub start_x: StartLine,
    /// Vertical start line
    pub start_y: StartLine,
    /// Pattern id
    pub pattern: String,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            gap_mm: 3.0,
            start_x: StartLine::Start,
            start_y: StartLine::Start,
            pattern: LINEAR_SQUARE.to_string(),
        }
    }
}

/// Complete TileKit configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid generation settings
    pub grid: GridConfig,
    /// Masking settings
    pub masking: MaskingConfig,
    /// Undo history settings
    pub history: HistoryConfig,
    /// Request defaults
    pub defaults: LayoutDefaults,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.grid.max_cells == 0 {
            return Err(SettingsError::invalid("grid.max_cells", "must be > 0"));
        }
        if self.grid.min_edge_cell.is_negative() {
            return Err(SettingsError::invalid(
                "grid.min_edge_cell",
                "must not be negative",
            ));
        }

        if self.masking.minimal_overlap_percent > 100 {
            return Err(SettingsError::invalid(
                "masking.minimal_overlap_percent",
                "must be between 0 and 100",
            ));
        }

        if self.history.max_size == 0 {
            return Err(SettingsError::invalid("history.max_size", "must be > 0"));
        }

        let gap = self.defaults.gap_mm;
        if !gap.is_finite()
            || gap < *GAP_RANGE_MM.start() as f64
            || gap > *GAP_RANGE_MM.end() as f64
        {
            return Err(SettingsError::invalid(
                "defaults.gap_mm",
                format!(
                    "must be between {} and {} mm",
                    GAP_RANGE_MM.start(),
                    GAP_RANGE_MM.end()
                ),
            ));
        }
        if !PatternRegistry::new().contains(&self.defaults.pattern) {
            return Err(SettingsError::invalid(
                "defaults.pattern",
                format!("unknown pattern '{}'", self.defaults.pattern),
            ));
        }

        Ok(())
    }

    /// Engine settings section
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            grid: self.grid,
            masking: self.masking,
            history: self.history,
        }
    }
}

/// `<platform config dir>/tilekit/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))?;
    path.push("tilekit");
    path.push("config.toml");
    Ok(path)
}
