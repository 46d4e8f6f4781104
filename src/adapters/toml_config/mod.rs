// TOML config adapter - Settings loaded from a TOML file

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::*;
use crate::domain::settings::Settings;
use crate::ports::ConfigPort;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "vidchew.toml";

/// TOML configuration adapter
#[derive(Debug, Default, Clone)]
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn parse(content: &str) -> Result<Settings, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::BadConfig(format!("Failed to parse TOML config: {}", e)))
    }

    /// Pick the config file: an explicit path, else `vidchew.toml` in `cwd` if present
    pub fn locate(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }
}

impl ConfigPort for TomlConfigAdapter {
    fn load(&self, path: Option<&Path>) -> Result<Settings, DomainError> {
        let Some(path) = path else {
            info!("Using internal config");
            return Ok(Settings::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::BadConfig(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let settings = Self::parse(&content)?;
        info!("Using config {}", path.display());
        Ok(settings)
    }
}
