//! Command handler modules for the CLI.

mod check;
mod completions;
mod init;
mod platform;
mod validate;
mod watch;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands, color: bool) -> Result<(), CliError> {
    match command {
        Commands::Check {
            target,
            threshold,
            format,
            strict,
        } => check::cmd_check(
            config_path,
            check::CheckParams {
                target: target.as_deref(),
                threshold: threshold.as_deref(),
                format,
                strict,
                color,
            },
        ),
        Commands::Watch {
            threshold,
            interval,
        } => watch::cmd_watch(config_path, threshold.as_deref(), interval, color),
        Commands::Platform { name } => platform::cmd_platform(name.as_deref()),
        Commands::ValidateThreshold { text } => validate::cmd_validate_threshold(&text),
        Commands::Init { force } => init::cmd_init(config_path, force),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
