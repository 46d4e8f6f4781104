// Batch interactor - Orchestrates the recursive re-encode use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{CodecType, UNKNOWN};
use crate::domain::rules::SkipFilter;
use crate::domain::settings::Settings;
use crate::error::{VidchewError, VidchewResult};
use crate::output::{size_mb, EncodeReport};
use crate::planner::{PlanAssembler, TranscodePlan};
use crate::ports::*;
use crate::utils::Utils;

const BANNER: &str = "-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+";

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Skipped { pattern: String },
    ProbeFailed { message: String },
    /// Dry run: planned but not encoded
    Planned { destination: PathBuf },
    Encoded { report: EncodeReport },
    Failed { destination: PathBuf, exit_code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Counters and timings of one batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub duration: Option<String>,
    pub seen: usize,
    pub skipped: usize,
    pub probe_failures: usize,
    pub planned: usize,
    pub encoded: usize,
    pub failed: usize,
    pub files: Vec<FileResult>,
}

impl BatchReport {
    fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
            started_at: Local::now(),
            finished_at: None,
            duration: None,
            seen: 0,
            skipped: 0,
            probe_failures: 0,
            planned: 0,
            encoded: 0,
            failed: 0,
            files: Vec::new(),
        }
    }

    fn record(&mut self, source: &Path, status: FileStatus) {
        match &status {
            FileStatus::Skipped { .. } => self.skipped += 1,
            FileStatus::ProbeFailed { .. } => self.probe_failures += 1,
            FileStatus::Planned { .. } => {}
            FileStatus::Encoded { .. } => self.encoded += 1,
            FileStatus::Failed { .. } => self.failed += 1,
        }
        self.files.push(FileResult {
            source: source.to_path_buf(),
            status,
        });
    }

    fn log_summary(&self) {
        info!("!! startTime: {}", Utils::format_timestamp(&self.started_at));
        if let Some(finished) = &self.finished_at {
            info!("!! endTime: {}", Utils::format_timestamp(finished));
        }
        if let Some(duration) = &self.duration {
            info!("!! duration: {}", duration);
        }
        info!(
            seen = self.seen,
            skipped = self.skipped,
            probe_failures = self.probe_failures,
            planned = self.planned,
            encoded = self.encoded,
            failed = self.failed,
            "Batch finished"
        );
    }
}

/// Interactor for the batch re-encode use case
pub struct BatchInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    fs_port: Arc<dyn FsPort>,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
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

    /// Walk `root` and process every file under the given settings.
    ///
    /// Returns [`VidchewError::EncodeFailed`] when an encode fails and
    /// `exit_on_fail` is set; every other per-file problem is recorded and the
    /// batch continues.
    pub async fn run(&self, root: &Path, settings: &Settings) -> VidchewResult<BatchReport> {
        let timer = Instant::now();
        let mut report = BatchReport::new(root, settings.dry_run);

        info!("!! startTime: {}", Utils::format_timestamp(&report.started_at));
        info!("!! inputFolder: {}", root.display());
        if settings.dry_run {
            info!("-- Dry run enabled!");
        }
        if settings.debug {
            info!("** Debugging output enabled!");
        }

        if !self.fs_port.directory_exists(root).await? {
            return Err(DomainError::FsFail(format!(
                "Input folder does not exist: {}",
                root.display()
            ))
            .into());
        }

        let files = self.fs_port.walk(root).await?;
        let skip_filter = SkipFilter::from_settings(settings);
        let assembler = PlanAssembler::new(settings);

        for source in files {
            report.seen += 1;
            let status = self
                .process_file(&source, settings, &skip_filter, &assembler, &mut report)
                .await;

            let halt = matches!(status, FileStatus::Failed { .. }) && settings.exit_on_fail;
            let failure = match &status {
                FileStatus::Failed { exit_code, .. } => exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                _ => String::new(),
            };
            report.record(&source, status);

            if halt {
                error!("!! Exit on fail is enabled, exiting...");
                self.finish(&mut report, timer);
                return Err(VidchewError::EncodeFailed {
                    path: source.display().to_string(),
                    status: failure,
                });
            }
        }

        self.finish(&mut report, timer);
        Ok(report)
    }

    fn finish(&self, report: &mut BatchReport, timer: Instant) {
        report.finished_at = Some(Local::now());
        report.duration = Some(Utils::format_duration(timer.elapsed()));
        report.log_summary();
    }

    async fn process_file(
        &self,
        source: &Path,
        settings: &Settings,
        skip_filter: &SkipFilter,
        assembler: &PlanAssembler<'_>,
        report: &mut BatchReport,
    ) -> FileStatus {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("{}", BANNER);
        info!("! Input: {}", file_name);
        if let Some(folder) = source.parent() {
            info!("! Folder: {}", folder.display());
        }
        info!("{}", BANNER);

        if let Some(pattern) = skip_filter.matched(&file_name) {
            info!("!! Filename contains \"{}\"! Skipping...", pattern);
            return FileStatus::Skipped {
                pattern: pattern.to_string(),
            };
        }

        let input_bytes = match self.fs_port.file_size(source).await {
            Ok(size) => size,
            Err(e) => {
                warn!("!! Could not read input size: {}", e);
                return FileStatus::ProbeFailed {
                    message: e.to_string(),
                };
            }
        };

        let media = match self.probe_port.probe(source).await {
            Ok(media) => media,
            Err(e) => {
                warn!("!! Could not retrieve input video info via ffprobe! {}", e);
                return FileStatus::ProbeFailed {
                    message: e.to_string(),
                };
            }
        };

        info!(
            "++ Number of streams: {} ({:.2} MB | {} kb/s)",
            media.streams.len(),
            size_mb(input_bytes),
            media.bit_rate_display()
        );
        info!("++ Number of video streams: {}", media.count_of(CodecType::Video));

        let plan = assembler.assemble(&media);
        report.planned += 1;
        for line in &plan.summary {
            info!("{}", line);
        }

        self.encode(&plan, settings, input_bytes).await
    }

    async fn encode(&self, plan: &TranscodePlan, settings: &Settings, input_bytes: u64) -> FileStatus {
        info!("-+- Encode -+-");
        info!("!! Destination: {}", plan.destination.display());
        info!("!! exec: {}", self.execute_port.command_line(plan).join(" "));

        if settings.dry_run {
            return FileStatus::Planned {
                destination: plan.destination.clone(),
            };
        }

        let report_path = settings.encoder_logs.then(|| plan.report_path());
        let outcome = match self.execute_port.execute(plan, report_path.as_deref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("!! {}", e);
                return FileStatus::Failed {
                    destination: plan.destination.clone(),
                    exit_code: None,
                };
            }
        };

        if !outcome.success {
            error!("!! ffmpeg exited prematurely and the encode is probably toast");
            if let Some(report) = &outcome.report_path {
                info!("!! ffmpeg log kept at {}", report.display());
            }
            return FileStatus::Failed {
                destination: plan.destination.clone(),
                exit_code: outcome.exit_code,
            };
        }

        let encoded = EncodeReport {
            destination: plan.destination.clone(),
            input_bytes,
            output_bytes: outcome.output_size,
        };
        info!(":: Encode Complete");
        for line in encoded.to_string().lines() {
            info!("\t {}", line);
        }

        FileStatus::Encoded { report: encoded }
    }
}
