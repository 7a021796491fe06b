//! Shared utility functions used across command modules.

use std::path::Path;

use inodewatch_core::config::{ConfigManager, Settings};
use inodewatch_core::parse_threshold;
use inodewatch_core::tracing::{TracingConfig, TracingLevel, init_tracing};

use crate::error::CliError;

pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Returns `code` when colors are enabled, otherwise an empty string
pub const fn color(code: &'static str, enabled: bool) -> &'static str {
    if enabled { code } else { "" }
}

/// Sets up logging on stderr from `-v` / `-q`
pub fn init_logging(verbose: u8, quiet: bool, ansi: bool) -> Result<(), CliError> {
    let config = TracingConfig::new()
        .with_level(TracingLevel::from_verbosity(verbose, quiet))
        .with_thread_ids(false)
        .with_ansi(ansi);
    init_tracing(&config).map_err(|e| CliError::Runtime(e.to_string()))
}

/// Creates a `ConfigManager` for the optional config file path from CLI
/// args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads settings and applies a command-line threshold override
pub fn load_settings(
    config_path: Option<&Path>,
    threshold: Option<&str>,
) -> Result<Settings, CliError> {
    let mut settings = create_config_manager(config_path)?.load()?;
    if let Some(text) = threshold {
        settings.monitor.threshold = parse_threshold(text)?;
    }
    Ok(settings)
}

/// Creates the async runtime used by polling commands
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("Failed to create async runtime: {e}")))
}
