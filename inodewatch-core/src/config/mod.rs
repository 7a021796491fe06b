//! Configuration management for `inodewatch`
//!
//! This module provides the `ConfigManager` for loading and saving
//! configuration files in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigManager};
pub use settings::{DEFAULT_CONCURRENCY, MonitorSettings, ProbeOverride, Settings, TargetConfig};
