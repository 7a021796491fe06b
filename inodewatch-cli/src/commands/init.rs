//! Configuration file creation command.

use std::path::Path;

use inodewatch_core::config::{Settings, TargetConfig};
use inodewatch_core::health::BUILT_IN_TARGET_NAME;

use crate::error::CliError;
use crate::util::create_config_manager;

/// Init command handler
pub fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;

    if manager.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            manager.config_path().display()
        )));
    }

    let settings = Settings {
        targets: vec![TargetConfig::new(BUILT_IN_TARGET_NAME, "/")],
        ..Default::default()
    };
    manager.save(&settings)?;

    println!("Wrote {}", manager.config_path().display());
    Ok(())
}
