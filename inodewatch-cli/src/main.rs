//! `inodewatch` - command-line front end for the inode usage monitor
//!
//! Runs one-shot checks or a periodic watch over the configured targets,
//! and helps write and validate the configuration.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if let Err(e) = util::init_logging(cli.verbose, cli.quiet, !cli.no_color) {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command, !cli.no_color);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
