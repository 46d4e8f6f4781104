//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, DefaultAppContainer, InspectRequest};
use crate::cli::args::{InspectArgs, RunArgs};
use crate::cli::Cli;
use crate::config_initialization::{initialize_settings, LoadedConfig};
use crate::utils::logging::{LogLevel, LoggingConfig, LoggingSystem};

fn load_config(cli: &Cli) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    let loaded = initialize_settings(cli, &cwd, |key| std::env::var(key).ok())?;
    Ok(loaded)
}

fn init_logging(cli: &Cli, loaded: &LoadedConfig, log_directory: Option<&Path>) -> Result<()> {
    let level = cli.log_level.unwrap_or(if loaded.settings.debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    let log_file = LoggingSystem::new(LoggingConfig {
        level,
        format: cli.log_format,
        file_directory: log_directory.map(Path::to_path_buf),
    })
    .initialize()?;

    match &loaded.source {
        Some(path) => info!("++ Using config: {}", path.display()),
        None => info!("-- Using internal config"),
    }
    if let Some(log_file) = log_file {
        info!("++ Log file: {}", log_file.display());
    }
    Ok(())
}

/// Execute the run command
pub async fn run(cli: &Cli, args: &RunArgs) -> Result<()> {
    let loaded = load_config(cli)?;

    let root = args
        .dir
        .canonicalize()
        .with_context(|| format!("Input folder does not exist: {}", args.dir.display()))?;
    let log_directory = loaded.settings.log_file.then_some(root.as_path());
    init_logging(cli, &loaded, log_directory)?;

    info!("!! vidchew {}", env!("CARGO_PKG_VERSION"));
    let container = DefaultAppContainer::new();
    let report = container
        .batch_interactor()
        .run(&root, &loaded.settings)
        .await?;

    info!(
        "Processed {} files: {} encoded, {} failed",
        report.seen, report.encoded, report.failed
    );
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let loaded = load_config(cli)?;
    init_logging(cli, &loaded, None)?;

    let container = DefaultAppContainer::new();
    let request = InspectRequest::new(&args.file, args.format);
    let rendered = container
        .inspect_interactor()
        .execute(&request, &loaded.settings)
        .await
        .with_context(|| format!("Failed to inspect {}", args.file.display()))?;

    println!("{}", rendered);
    Ok(())
}
