// Inspect interactor - Probes one file and renders the plan it would get

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::{display_or_unknown, MediaInfo, UNKNOWN};
use crate::domain::settings::Settings;
use crate::planner::{PlanAssembler, TranscodePlan};
use crate::ports::*;

/// Rendering of an inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: PathBuf,
    pub format: InspectFormat,
}

impl InspectRequest {
    pub fn new(input_path: impl Into<PathBuf>, format: InspectFormat) -> Self {
        Self {
            input_path: input_path.into(),
            format,
        }
    }
}

/// Probe result together with the plan derived from it
#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub media_info: MediaInfo,
    pub plan: TranscodePlan,
    /// Encoder invocation, program first
    pub command: Vec<String>,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            fs_port,
        }
    }

    /// Probe and plan a single file without encoding it
    pub async fn inspect(
        &self,
        request: &InspectRequest,
        settings: &Settings,
    ) -> Result<InspectResponse, DomainError> {
        let path = request.input_path.as_path();
        info!("Starting media file inspection for: {}", path.display());

        if self.fs_port.file_size(path).await.is_err() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let media_info = self.probe_port.probe(path).await?;
        let plan = PlanAssembler::new(settings).assemble(&media_info);
        let command = self.execute_port.command_line(&plan);

        Ok(InspectResponse {
            media_info,
            plan,
            command,
        })
    }

    /// Inspect and render in the requested format
    pub async fn execute(
        &self,
        request: &InspectRequest,
        settings: &Settings,
    ) -> Result<String, DomainError> {
        let response = self.inspect(request, settings).await?;
        match request.format {
            InspectFormat::Json => serde_json::to_string_pretty(&response)
                .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e))),
            InspectFormat::Yaml => serde_yaml::to_string(&response)
                .map_err(|e| DomainError::InternalError(format!("YAML serialization failed: {}", e))),
            InspectFormat::Text => Ok(format_as_text(&request.input_path, &response)),
        }
    }
}

/// Human-readable rendering
fn format_as_text(path: &Path, response: &InspectResponse) -> String {
    let media = &response.media_info;
    let mut output = String::new();

    let _ = writeln!(output, "Media File Information:");
    let _ = writeln!(output, "  File: {}", path.display());
    let _ = writeln!(
        output,
        "  Container: {}",
        media.format_name.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(output, "  Bitrate: {} kb/s", media.bit_rate_display());
    let _ = writeln!(output, "  Streams: {}", media.streams.len());

    for stream in &media.streams {
        let _ = writeln!(
            output,
            "    #{} {:?} | codec: {} | language: {} | channels: {} | {}x{}",
            stream.index,
            stream.codec_type,
            stream.codec_name.as_deref().unwrap_or(UNKNOWN),
            stream.language.as_deref().unwrap_or(UNKNOWN),
            display_or_unknown(stream.channels),
            display_or_unknown(stream.width),
            display_or_unknown(stream.height)
        );
    }

    let _ = writeln!(output);
    for line in &response.plan.summary {
        let _ = writeln!(output, "{}", line);
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Destination: {}", response.plan.destination.display());
    let _ = writeln!(output, "Command: {}", response.command.join(" "));

    output
}
