//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for microapis using clap's derive macros.

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::StaticConfig;
use crate::errors::{AppError, Result};

/// microapis - URL shortener, file metadata inspector and exercise tracker
#[derive(Parser, Debug)]
#[command(name = "microapis")]
#[command(version)]
#[command(about = "Small HTTP micro-services behind one server", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Write a sample configuration file
    GenerateConfig {
        /// Output file path
        #[arg(long, short = 'o', default_value = "config.toml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Write the default configuration as TOML to `output`.
pub fn generate_config(output: &str, force: bool) -> Result<()> {
    if Path::new(output).exists() && !force {
        return Err(AppError::file_operation(format!(
            "{} already exists, use --force to overwrite",
            output
        )));
    }
    StaticConfig::default().save_to_file(output)
}
