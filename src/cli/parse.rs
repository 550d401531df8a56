//! CLI parse: clap types for devforge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Devforge CLI - Development container artifact generation
#[derive(Parser)]
#[command(name = "devforge")]
#[command(about = "Generate development container artifacts from a small configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides devforge.toml in the workspace)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactively collect a configuration and write devforge.toml
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Generate devcontainer artifacts from the configuration
    Generate {
        /// Directory to write the .devcontainer directory into
        /// (default: the workspace root)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the editor manifest to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },
    /// Validate the configuration and show the resolved decisions
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
