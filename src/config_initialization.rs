//! Configuration initialization and hierarchy management
//!
//! Precedence, lowest first: built-in defaults, config file, environment, CLI.
//! The merged settings are validated once; a configuration that cannot run is
//! rejected before any file is touched.

use std::path::{Path, PathBuf};

use crate::adapters::TomlConfigAdapter;
use crate::cli::{Cli, Commands};
use crate::domain::settings::Settings;
use crate::error::{VidchewError, VidchewResult};
use crate::ports::ConfigPort;

pub const ENV_DRY_RUN: &str = "VIDCHEW_DRY_RUN";
pub const ENV_DEST_DIR: &str = "VIDCHEW_DEST_DIR";
pub const ENV_TARGET_LANGUAGE: &str = "VIDCHEW_TARGET_LANGUAGE";

/// Settings together with the file they came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// `None` when running on built-in defaults
    pub source: Option<PathBuf>,
}

/// Values that replace whatever the config file says
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub dry_run: Option<bool>,
    pub debug: Option<bool>,
    pub dest_dir: Option<PathBuf>,
    pub target_language: Option<String>,
    pub crf: Option<u8>,
}

impl ConfigOverrides {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(dry_run) = self.dry_run {
            settings.dry_run = dry_run;
        }
        if let Some(debug) = self.debug {
            settings.debug = debug;
        }
        if let Some(dest_dir) = self.dest_dir {
            settings.dest_dir = Some(dest_dir);
        }
        if let Some(language) = self.target_language {
            settings.target_language = language;
        }
        if let Some(crf) = self.crf {
            settings.video.crf = crf;
        }
    }
}

fn parse_bool(name: &str, value: &str) -> VidchewResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(VidchewError::config(format!(
            "{} must be a boolean, got \"{}\"",
            name, value
        ))),
    }
}

/// Overrides read through `lookup`, normally `std::env::var`
pub fn env_overrides<F>(lookup: F) -> VidchewResult<ConfigOverrides>
where
    F: Fn(&str) -> Option<String>,
{
    let dry_run = match lookup(ENV_DRY_RUN) {
        Some(value) => Some(parse_bool(ENV_DRY_RUN, &value)?),
        None => None,
    };

    Ok(ConfigOverrides {
        dry_run,
        debug: None,
        dest_dir: lookup(ENV_DEST_DIR).map(PathBuf::from),
        target_language: lookup(ENV_TARGET_LANGUAGE).filter(|l| !l.is_empty()),
        crf: None,
    })
}

/// Overrides given on the command line
pub fn cli_overrides(cli: &Cli) -> ConfigOverrides {
    match &cli.command {
        Commands::Run(args) => ConfigOverrides {
            dry_run: if args.execute {
                Some(false)
            } else if args.dry_run {
                Some(true)
            } else {
                None
            },
            debug: args.debug.then_some(true),
            dest_dir: args.dest_dir.clone(),
            target_language: None,
            crf: args.crf,
        },
        Commands::Inspect(_) => ConfigOverrides::default(),
    }
}

/// Reject settings that make a run impossible
pub fn validate(settings: &Settings) -> VidchewResult<()> {
    settings
        .validate()
        .map_err(|e| VidchewError::config(e.to_string()))?;

    if let Some(dest_dir) = settings.dest_dir() {
        if !dest_dir.is_dir() {
            return Err(VidchewError::config(format!(
                "destination directory does not exist: {}",
                dest_dir.display()
            )));
        }
    }

    Ok(())
}

/// Build the settings snapshot for this invocation
pub fn initialize_settings<F>(cli: &Cli, cwd: &Path, env: F) -> VidchewResult<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let source = TomlConfigAdapter::locate(cli.config.as_deref(), cwd);
    let mut settings = TomlConfigAdapter::new()
        .load(source.as_deref())
        .map_err(|e| VidchewError::config(e.to_string()))?;

    env_overrides(env)?.apply(&mut settings);
    cli_overrides(cli).apply(&mut settings);
    validate(&settings)?;

    Ok(LoadedConfig { settings, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["vidchew", "run"]).unwrap();

        let loaded = initialize_settings(&cli, temp.path(), no_env).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn test_precedence_file_env_cli() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("vidchew.toml"),
            "dry_run = false\ntarget_language = \"ger\"\n[video]\ncrf = 18\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from(["vidchew", "run", "--dry-run", "--crf", "24"]).unwrap();
        let env = env_of(&[(ENV_TARGET_LANGUAGE, "jpn")]);

        let loaded = initialize_settings(&cli, temp.path(), env).unwrap();
        assert_eq!(loaded.source, Some(temp.path().join("vidchew.toml")));
        assert!(loaded.settings.dry_run);
        assert_eq!(loaded.settings.target_language, "jpn");
        assert_eq!(loaded.settings.video.crf, 24);
    }

    #[test]
    fn test_execute_flag_beats_environment() {
        let temp = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["vidchew", "run", "--execute"]).unwrap();
        let env = env_of(&[(ENV_DRY_RUN, "true")]);

        let loaded = initialize_settings(&cli, temp.path(), env).unwrap();
        assert!(!loaded.settings.dry_run);
    }

    #[test]
    fn test_both_audio_modes_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("custom.toml");
        fs::write(&config, "[audio.downmix]\nenabled = true\n").unwrap();

        let cli = Cli::try_parse_from([
            "vidchew",
            "--config",
            config.to_str().unwrap(),
            "run",
        ])
        .unwrap();

        let err = initialize_settings(&cli, temp.path(), no_env).unwrap_err();
        assert!(matches!(err, VidchewError::ConfigError { .. }));
        assert!(err.to_string().contains("cannot both be enabled"));
    }

    #[test]
    fn test_missing_dest_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let env = env_of(&[(ENV_DEST_DIR, "/definitely/not/here")]);
        let cli = Cli::try_parse_from(["vidchew", "run"]).unwrap();

        let err = initialize_settings(&cli, temp.path(), env).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_invalid_boolean_in_environment() {
        let err = env_overrides(env_of(&[(ENV_DRY_RUN, "MAYBE")])).unwrap_err();
        assert!(matches!(err, VidchewError::ConfigError { .. }));
        assert!(err.to_string().contains("\"MAYBE\""), "{}", err);

        let overrides = env_overrides(env_of(&[(ENV_DRY_RUN, " Yes ")])).unwrap();
        assert_eq!(overrides.dry_run, Some(true));

        let overrides = env_overrides(env_of(&[(ENV_DRY_RUN, "0")])).unwrap();
        assert_eq!(overrides.dry_run, Some(false));
    }
}
