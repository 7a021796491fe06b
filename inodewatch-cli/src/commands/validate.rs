//! Threshold validation command.

use inodewatch_core::parse_threshold;

use crate::error::CliError;

/// Validate threshold command handler
pub fn cmd_validate_threshold(text: &str) -> Result<(), CliError> {
    let threshold = parse_threshold(text)?;
    println!("Valid threshold: {threshold}");
    Ok(())
}
