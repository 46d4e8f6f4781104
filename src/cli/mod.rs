//! CLI module for vidchew
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// vidchew - recursive batch video re-encoder
///
/// Walks a directory tree, picks the best video, audio and subtitle track of
/// every file and re-encodes it to Matroska with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "vidchew")]
#[command(about = "Recursive batch video re-encoder with policy-driven track selection")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./vidchew.toml, else built-in defaults)
    #[arg(long, env = "VIDCHEW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (default: info, or debug when `debug` is enabled)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Console log format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-encode every video under a directory
    Run(args::RunArgs),
    /// Probe one file and show the plan it would get
    Inspect(args::InspectArgs),
}
