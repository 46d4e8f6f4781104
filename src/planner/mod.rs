//! Transcode planning
//!
//! Turns a probed container and the run settings into a [`TranscodePlan`]: which
//! tracks are kept, what happens to each of them, and where the output goes.
//! Every function in this module is pure; nothing here touches the filesystem or
//! spawns a process.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::AudioTrack;
use crate::streams::SubtitleSelection;

pub mod audio;
pub mod strategy;
pub mod video;

pub use audio::plan_audio;
pub use strategy::PlanAssembler;
pub use video::plan_video;

/// Suffix of the per-encode ffmpeg report, appended to the output file name
pub const REPORT_SUFFIX: &str = "-report.log";

/// Target of an audio re-encode or downmix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioTarget {
    pub codec: String,
    pub bitrate_kbps: u32,
    /// `None` keeps the input channel layout
    pub channels: Option<u32>,
}

/// What happens to the selected audio track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", content = "target", rename_all = "snake_case")]
pub enum AudioOperation {
    /// No audio track; the output has no audio
    Drop,
    Copy,
    Reencode(AudioTarget),
    Downmix(AudioTarget),
}

/// Audio decision together with the labels used in the output name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioPlan {
    pub operation: AudioOperation,
    /// Codec written to the output; the input codec when copied
    pub codec_tag: Option<String>,
    /// Channels written to the output, zero when unknown or dropped
    pub channels: u32,
}

impl AudioPlan {
    pub fn drop_audio() -> Self {
        Self {
            operation: AudioOperation::Drop,
            codec_tag: None,
            channels: 0,
        }
    }

    pub fn is_dropped(&self) -> bool {
        self.operation == AudioOperation::Drop
    }
}

/// Scale filter applied to the video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub width: u32,
    pub height: u32,
    /// Also set the display aspect ratio to 16:9
    pub force_16_9: bool,
}

impl Scale {
    /// Value of the `-vf` option
    pub fn filter(&self) -> String {
        let mut filter = format!("scale={}:{}", self.width, self.height);
        if self.force_16_9 {
            filter.push_str(",setdar=dar=16/9");
        }
        filter
    }
}

/// Video encode settings for the selected video track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoPlan {
    pub stream_index: usize,
    pub codec: String,
    pub preset: String,
    pub crf: u8,
    pub scale: Option<Scale>,
    pub output_width: Option<u32>,
    pub output_height: Option<u32>,
    pub output_aspect: Option<String>,
}

/// Default flags of the first output stream of each kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dispositions {
    pub video_default: bool,
    pub audio_default: bool,
    pub subtitle_default: bool,
}

impl Default for Dispositions {
    fn default() -> Self {
        Self {
            video_default: true,
            audio_default: true,
            subtitle_default: false,
        }
    }
}

/// Metadata carried over from the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDirective {
    /// Drop container level metadata such as the title
    pub strip_container: bool,
    pub audio_language: Option<String>,
    pub subtitle_language: Option<String>,
    pub keep_chapters: bool,
}

/// Complete per-file decision, consumed once by the encoder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodePlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub video: Option<VideoPlan>,
    pub audio_track: Option<AudioTrack>,
    pub audio: AudioPlan,
    pub subtitle: Option<SubtitleSelection>,
    pub dispositions: Dispositions,
    pub metadata: MetadataDirective,
    /// Human-readable description of the plan, one entry per line
    pub summary: Vec<String>,
}

impl TranscodePlan {
    /// Where ffmpeg writes its report: next to the input, named after the output
    pub fn report_path(&self) -> PathBuf {
        let file_name = self
            .destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = self.source.parent().unwrap_or_else(|| Path::new("."));
        directory.join(format!("{}{}", file_name, REPORT_SUFFIX))
    }
}
