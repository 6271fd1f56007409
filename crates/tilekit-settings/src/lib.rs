//! TileKit Settings Crate
//!
//! Handles engine configuration, layout defaults and their persistence.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, LayoutDefaults};
pub use error::{SettingsError, SettingsResult};
