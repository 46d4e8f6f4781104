// Settings - Immutable run configuration shared by every decision function

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Highest CRF accepted by the x264/x265 encoders
pub const MAX_CRF: u8 = 51;

/// Complete configuration snapshot, built once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Do everything except encode
    pub dry_run: bool,
    /// Trace the audio selection logic
    pub debug: bool,
    /// Write a log file into the scanned directory
    pub log_file: bool,
    /// Ask ffmpeg for a report file per encode
    pub encoder_logs: bool,
    /// Stop the batch on the first failed encode
    pub exit_on_fail: bool,
    /// Output directory; empty or absent means next to the input
    pub dest_dir: Option<PathBuf>,
    /// Appended to every output file name
    pub file_tag: String,
    /// Files whose name contains any of these are skipped
    pub skip: Vec<String>,
    /// ISO 639-2 code wanted for audio and subtitles
    pub target_language: String,
    pub video: VideoSettings,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let file_tag = "-myTag".to_string();
        Self {
            dry_run: true,
            debug: false,
            log_file: true,
            encoder_logs: true,
            exit_on_fail: false,
            dest_dir: None,
            skip: vec![file_tag.clone(), "vidchew".to_string()],
            file_tag,
            target_language: "eng".to_string(),
            video: VideoSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

/// Video encoding and downscaling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoSettings {
    pub codec: String,
    pub preset: String,
    pub crf: u8,
    pub downscale: bool,
    pub max_width: u32,
    pub max_height: u32,
    pub force_16_9: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            codec: "libx265".to_string(),
            preset: "medium".to_string(),
            crf: 22,
            downscale: true,
            max_width: 1920,
            max_height: 1080,
            force_16_9: true,
        }
    }
}

/// Audio selection and transformation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioSettings {
    /// Deep-search priority, most preferred first; `""` is a pass for any codec
    pub preferred_formats: Vec<String>,
    pub reencode: ReencodeSettings,
    pub downmix: DownmixSettings,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            preferred_formats: ["ac3", "eac3", "dts", "aac", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            reencode: ReencodeSettings::default(),
            downmix: DownmixSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReencodeSettings {
    pub enabled: bool,
    /// Re-encode even when the input bitrate is already at or below target
    pub force: bool,
    pub codec: String,
    pub bitrate_stereo: u32,
    pub bitrate_surround: u32,
    pub channels_surround: u32,
}

impl Default for ReencodeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            force: false,
            codec: "ac3".to_string(),
            bitrate_stereo: 256,
            bitrate_surround: 640,
            channels_surround: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownmixSettings {
    pub enabled: bool,
    pub codec: String,
    pub channels: u32,
    pub bitrate: u32,
}

impl Default for DownmixSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            codec: "libfdk_aac".to_string(),
            channels: 2,
            bitrate: 256,
        }
    }
}

/// Active audio policy, derived from validated settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioMode<'a> {
    /// Neither re-encoding nor downmixing; audio is copied
    Passthrough,
    Reencode(&'a ReencodeSettings),
    Downmix(&'a DownmixSettings),
}

impl AudioSettings {
    /// Resolve the audio policy. Settings with both modes enabled never pass
    /// [`Settings::validate`].
    pub fn mode(&self) -> AudioMode<'_> {
        if self.reencode.enabled {
            AudioMode::Reencode(&self.reencode)
        } else if self.downmix.enabled {
            AudioMode::Downmix(&self.downmix)
        } else {
            AudioMode::Passthrough
        }
    }
}

impl Settings {
    /// Check rules that make a run impossible
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.audio.reencode.enabled && self.audio.downmix.enabled {
            return Err(DomainError::BadConfig(
                "audio re-encoding and downmixing cannot both be enabled".to_string(),
            ));
        }

        if self.video.crf > MAX_CRF {
            return Err(DomainError::BadConfig(format!(
                "CRF value cannot exceed {}, got {}",
                MAX_CRF, self.video.crf
            )));
        }

        if self.video.downscale && (self.video.max_width == 0 || self.video.max_height == 0) {
            return Err(DomainError::BadConfig(
                "downscale dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Output directory override, ignoring an empty path
    pub fn dest_dir(&self) -> Option<&Path> {
        self.dest_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    pub fn audio_mode(&self) -> AudioMode<'_> {
        self.audio.mode()
    }
}
