//! vidchew
//!
//! Walks a directory tree and re-encodes every video it finds to HEVC/x265 in
//! Matroska, keeping one audio and one subtitle track chosen by policy.
//!
//! # Usage
//!
//! ```bash
//! vidchew run /media/movies              # dry run with the default config
//! vidchew run /media/movies --execute    # encode for real
//! vidchew inspect movie.mkv --format json
//! ```

use anyhow::Result;
use clap::Parser;

use vidchew::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run(args) => commands::run(&cli, args).await,
        Commands::Inspect(args) => commands::inspect(&cli, args).await,
    }
}
