// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::MediaInfo;
use crate::domain::settings::Settings;
use crate::planner::TranscodePlan;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return its stream metadata
    async fn probe(&self, path: &Path) -> Result<MediaInfo, DomainError>;
}

/// Outcome of one encoder run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeOutcome {
    pub success: bool,
    /// `None` when the encoder was killed by a signal
    pub exit_code: Option<i32>,
    /// Size of the written output, zero when absent
    pub output_size: u64,
    /// Final location of the encoder report, if one was requested
    pub report_path: Option<PathBuf>,
}

/// Port for running the encoder
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Program and arguments that [`ExecutePort::execute`] would run
    fn command_line(&self, plan: &TranscodePlan) -> Vec<String>;

    /// Execute a transcode plan, optionally asking the encoder for a report file.
    /// A non-zero encoder exit is an unsuccessful outcome, not an error.
    async fn execute(
        &self,
        plan: &TranscodePlan,
        report: Option<&Path>,
    ) -> Result<EncodeOutcome, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Every regular file under `root`: files of a directory first, in lexical
    /// order, then its subdirectories in lexical order
    async fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, DomainError>;

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError>;

    async fn directory_exists(&self, path: &Path) -> Result<bool, DomainError>;
}

/// Port for configuration loading
pub trait ConfigPort: Send + Sync {
    /// Load settings from a file, or the built-in defaults when `path` is `None`
    fn load(&self, path: Option<&Path>) -> Result<Settings, DomainError>;
}
