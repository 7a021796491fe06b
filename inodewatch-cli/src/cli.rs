//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Watches inode usage and marks targets offline above a threshold
#[derive(Parser)]
#[command(name = "inodewatch")]
#[command(author, version, about = "Inode usage monitor")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "INODEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Poll targets once and print the verdicts
    #[command(about = "Poll one or all targets once")]
    Check {
        /// Target id (default: all targets)
        target: Option<String>,

        /// Override the configured threshold (e.g. "90%")
        #[arg(short, long)]
        threshold: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Exit with code 2 if a target is offline or could not be probed
        #[arg(long)]
        strict: bool,
    },

    /// Poll periodically and print state changes
    #[command(about = "Poll on an interval and report transitions until Ctrl-C")]
    Watch {
        /// Override the configured threshold (e.g. "90%")
        #[arg(short, long)]
        threshold: Option<String>,

        /// Override the configured interval in seconds
        #[arg(short, long)]
        interval: Option<u32>,
    },

    /// Show the probe used for a platform
    #[command(about = "Show the probe command for a platform (default: this host)")]
    Platform {
        /// Platform name such as "Linux" or "Mac OS X"
        name: Option<String>,
    },

    /// Check a threshold string
    #[command(name = "validate-threshold", about = "Validate a threshold such as \"95%\"")]
    ValidateThreshold {
        /// Threshold text
        text: String,
    },

    /// Write a default configuration file
    #[command(about = "Create a configuration file with default settings")]
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format for `check`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}
