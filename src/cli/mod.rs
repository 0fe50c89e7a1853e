//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for course-import using clap.

pub mod commands;
pub mod progress;

use clap::{Parser, Subcommand};

/// course-import - upload a course archive to Studio and follow the import
#[derive(Parser, Debug)]
#[command(name = "course-import")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "course-import.toml", env = "COURSE_IMPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COURSE_IMPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a course archive and follow the import until it finishes
    Import(commands::import::ImportArgs),

    /// Resume following the last recorded import
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
