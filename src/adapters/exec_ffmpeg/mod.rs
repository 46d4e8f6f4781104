//! FFmpeg execution adapter
//!
//! The command line is a plain argument vector derived from the plan and run
//! without a shell. Stdin is closed so a waiting prompt can never stall a batch.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::planner::{AudioOperation, TranscodePlan};
use crate::ports::{EncodeOutcome, ExecutePort};

/// Verbosity requested from ffmpeg for its report file
const REPORT_LEVEL: u32 = 40;

/// Suffix given to the report of a failed encode
pub const FAILED_REPORT_SUFFIX: &str = ".ERROR";

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    ffmpeg_path: PathBuf,
}

impl FFmpegAdapter {
    /// Create an adapter that runs `ffmpeg` from `PATH`
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Build the ffmpeg argument list for a plan
pub fn build_args(plan: &TranscodePlan) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-v".into(), "verbose".into(), "-i".into()];
    args.push(plan.source.to_string_lossy().into_owned());

    if let Some(video) = &plan.video {
        args.extend(["-map".to_string(), format!("0:{}", video.stream_index)]);
    }
    if let Some(track) = &plan.audio_track {
        args.extend(["-map".to_string(), format!("0:{}", track.index)]);
    }
    if let Some(subtitle) = &plan.subtitle {
        args.extend(["-map".to_string(), format!("0:{}", subtitle.track.index)]);
    }

    if let Some(language) = &plan.metadata.audio_language {
        args.extend(["-metadata:s:a:0".to_string(), format!("language={}", language)]);
    }
    if let Some(language) = &plan.metadata.subtitle_language {
        args.extend(["-metadata:s:s:0".to_string(), format!("language={}", language)]);
    }

    if let Some(video) = &plan.video {
        if let Some(scale) = &video.scale {
            args.extend(["-vf".to_string(), scale.filter()]);
        }
        args.extend([
            "-c:v".to_string(),
            video.codec.clone(),
            "-preset".to_string(),
            video.preset.clone(),
            "-crf".to_string(),
            video.crf.to_string(),
        ]);
    }

    match &plan.audio.operation {
        AudioOperation::Drop => args.push("-an".into()),
        AudioOperation::Copy => args.extend(["-c:a".to_string(), "copy".to_string()]),
        AudioOperation::Reencode(target) | AudioOperation::Downmix(target) => {
            args.extend([
                "-c:a".to_string(),
                target.codec.clone(),
                "-b:a".to_string(),
                format!("{}k", target.bitrate_kbps),
            ]);
            if let Some(channels) = target.channels {
                args.extend(["-ac".to_string(), channels.to_string()]);
            }
        }
    }

    if let Some(subtitle) = &plan.subtitle {
        args.extend(["-c:s".to_string(), subtitle.mode.encoder_arg().to_string()]);
    }

    if plan.video.is_some() {
        args.extend([
            "-disposition:v:0".to_string(),
            flag(plan.dispositions.video_default),
        ]);
    }
    if !plan.audio.is_dropped() {
        args.extend([
            "-disposition:a:0".to_string(),
            flag(plan.dispositions.audio_default),
        ]);
    }
    if plan.subtitle.is_some() {
        args.extend([
            "-disposition:s:0".to_string(),
            flag(plan.dispositions.subtitle_default),
        ]);
    }

    if plan.metadata.strip_container {
        args.extend(["-map_metadata".to_string(), "-1".to_string()]);
    }
    if plan.metadata.keep_chapters {
        args.extend(["-map_chapters".to_string(), "0".to_string()]);
    }

    args.push(plan.destination.to_string_lossy().into_owned());
    args
}

/// Value of the `FFREPORT` environment variable for a report file
pub fn report_env(report: &Path) -> String {
    let mut escaped = String::new();
    for c in report.to_string_lossy().chars() {
        if matches!(c, ':' | '\\' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("file={}:level={}", escaped, REPORT_LEVEL)
}

/// Path a failed report is renamed to
pub fn failed_report_path(report: &Path) -> PathBuf {
    let mut name = report.as_os_str().to_os_string();
    name.push(FAILED_REPORT_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    fn command_line(&self, plan: &TranscodePlan) -> Vec<String> {
        let mut line = vec![self.ffmpeg_path.to_string_lossy().into_owned()];
        line.extend(build_args(plan));
        line
    }

    async fn execute(
        &self,
        plan: &TranscodePlan,
        report: Option<&Path>,
    ) -> Result<EncodeOutcome, DomainError> {
        let mut command = Command::new(&self.ffmpeg_path);
        command.args(build_args(plan)).stdin(Stdio::null());
        if let Some(report) = report {
            info!("ffmpeg log: {}", report.display());
            command.env("FFREPORT", report_env(report));
        }

        let status = command
            .status()
            .await
            .map_err(|e| DomainError::ExecFail(format!("Failed to run ffmpeg: {}", e)))?;

        if !status.success() {
            warn!("ffmpeg exited prematurely ({}) and the encode is probably broken", status);

            let mut report_path = report.map(Path::to_path_buf);
            if let Some(report) = report {
                let failed = failed_report_path(report);
                match tokio::fs::rename(report, &failed).await {
                    Ok(()) => report_path = Some(failed),
                    Err(e) => warn!("Could not rename {}: {}", report.display(), e),
                }
            }

            return Ok(EncodeOutcome {
                success: false,
                exit_code: status.code(),
                output_size: 0,
                report_path,
            });
        }

        info!("ffmpeg exited normally");
        let output_size = tokio::fs::metadata(&plan.destination)
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(EncodeOutcome {
            success: true,
            exit_code: status.code(),
            output_size,
            report_path: report.map(Path::to_path_buf),
        })
    }
}
