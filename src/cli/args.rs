//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::app::InspectFormat;
use crate::domain::settings::MAX_CRF;

fn parse_crf(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, MAX_CRF)
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory to scan recursively
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Plan and log everything but do not encode
    #[arg(long, conflicts_with = "execute")]
    pub dry_run: bool,

    /// Encode, even if the configuration asks for a dry run
    #[arg(long)]
    pub execute: bool,

    /// Write outputs here instead of next to each input
    #[arg(long)]
    pub dest_dir: Option<PathBuf>,

    /// Constant Rate Factor (0-51)
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Trace the audio selection logic
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Media file to probe
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = InspectFormat::Text)]
    pub format: InspectFormat,
}
