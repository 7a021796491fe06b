//! Loading and saving `config.toml`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

use super::settings::Settings;

/// Directory name under the user configuration directory
pub const CONFIG_DIR_NAME: &str = "inodewatch";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Reads and writes the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `$XDG_CONFIG_HOME/inodewatch/config.toml` (or the platform equivalent)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has no
    /// configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_path(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    /// Uses an explicit file path
    #[must_use]
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Path of the configuration file
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// True if the file exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Loads and validates the settings. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML,
    /// contains an invalid threshold, or repeats a target id.
    pub fn load(&self) -> ConfigResult<Settings> {
        let _span = crate::trace_operation_debug!(
            span_names::CONFIG_LOAD,
            path = %self.config_path.display()
        )
        .entered();

        if !self.exists() {
            tracing::debug!("No configuration file, using defaults");
            return Ok(Settings::default());
        }

        let text = std::fs::read_to_string(&self.config_path).map_err(|source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        })?;
        let settings: Settings =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;

        tracing::debug!(
            targets = settings.targets.len(),
            threshold = %settings.monitor.threshold,
            "Configuration loaded"
        );
        Ok(settings)
    }

    /// Writes the settings, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or cannot be written.
    pub fn save(&self, settings: &Settings) -> ConfigResult<()> {
        let _span = crate::trace_operation_debug!(
            span_names::CONFIG_SAVE,
            path = %self.config_path.display()
        )
        .entered();
        settings.validate()?;
        let text =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.config_path, text).map_err(|source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        })?;
        tracing::info!(path = %self.config_path.display(), "Configuration saved");
        Ok(())
    }
}
