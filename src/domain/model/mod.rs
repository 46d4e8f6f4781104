// Domain models - Stream metadata as reported by the prober

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Text shown wherever a probed value is absent
pub const UNKNOWN: &str = "unknown";

/// Profile string ffprobe reports for lossless DTS
pub const DTS_HD_MA_PROFILE: &str = "DTS-HD MA";
/// Codec label used for DTS-HD MA tracks whose bitrate is not reported
pub const DTS_HD_MA_LABEL: &str = "dts-hd ma";
/// Assumed bitrate of a DTS-HD MA track without a reported bitrate
pub const DTS_HD_MA_ESTIMATE_KBPS: u32 = 1536;
/// Upper bound used for TrueHD tracks, which never report a bitrate
pub const TRUEHD_CEILING_KBPS: u32 = 18000;

/// Format an optional value, falling back to [`UNKNOWN`]
pub fn display_or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Kind of elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl CodecType {
    /// Map the prober's `codec_type` string
    pub fn parse(codec_type: &str) -> Self {
        match codec_type {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            _ => CodecType::Other,
        }
    }
}

/// One stream of a probed container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub index: usize,
    pub codec_type: CodecType,
    pub codec_name: Option<String>,
    pub language: Option<String>,
    pub channels: Option<u32>,
    pub bit_rate_kbps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub display_aspect_ratio: Option<String>,
    pub profile: Option<String>,
}

impl StreamDescriptor {
    /// Create a descriptor with every optional field absent
    pub fn new(index: usize, codec_type: CodecType) -> Self {
        Self {
            index,
            codec_type,
            codec_name: None,
            language: None,
            channels: None,
            bit_rate_kbps: None,
            width: None,
            height: None,
            display_aspect_ratio: None,
            profile: None,
        }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec_name = Some(codec.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_bit_rate_kbps(mut self, kbps: u32) -> Self {
        self.bit_rate_kbps = Some(kbps);
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_aspect_ratio(mut self, dar: impl Into<String>) -> Self {
        self.display_aspect_ratio = Some(dar.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Check whether the stream is tagged with the given language
    pub fn has_language(&self, language: &str) -> bool {
        self.language.as_deref() == Some(language)
    }
}

/// Bitrate of an audio track, measured or estimated from its format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "kbps", rename_all = "lowercase")]
pub enum AudioBitrate {
    /// Reported by the prober
    Measured(u32),
    /// Typical value for a format that omits its bitrate
    Estimated(u32),
    /// Format maximum, not a measurement
    Ceiling(u32),
    /// Nothing known; treated as zero
    Unknown,
}

impl AudioBitrate {
    /// Numeric value used by the planners, zero when unknown
    pub fn kbps(&self) -> u32 {
        match self {
            AudioBitrate::Measured(kbps)
            | AudioBitrate::Estimated(kbps)
            | AudioBitrate::Ceiling(kbps) => *kbps,
            AudioBitrate::Unknown => 0,
        }
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioBitrate::Measured(kbps) | AudioBitrate::Estimated(kbps) => write!(f, "{}", kbps),
            AudioBitrate::Ceiling(kbps) => write!(f, "{} (max)", kbps),
            AudioBitrate::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}

/// Audio stream as seen by the selector and the audio planner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    pub index: usize,
    pub language: Option<String>,
    /// Effective codec label; DTS-HD MA without a bitrate becomes `"dts-hd ma"`
    pub codec: Option<String>,
    /// Channel count, zero when unknown
    pub channels: u32,
    pub bitrate: AudioBitrate,
}

impl AudioTrack {
    /// Apply the bitrate heuristics to a probed audio stream
    pub fn from_descriptor(stream: &StreamDescriptor) -> Self {
        let codec_name = stream.codec_name.as_deref();
        let is_dts_hd_ma =
            codec_name == Some("dts") && stream.profile.as_deref() == Some(DTS_HD_MA_PROFILE);

        let (codec, bitrate) = match stream.bit_rate_kbps {
            Some(kbps) => (stream.codec_name.clone(), AudioBitrate::Measured(kbps)),
            None if is_dts_hd_ma => (
                Some(DTS_HD_MA_LABEL.to_string()),
                AudioBitrate::Estimated(DTS_HD_MA_ESTIMATE_KBPS),
            ),
            None if codec_name == Some("truehd") => (
                stream.codec_name.clone(),
                AudioBitrate::Ceiling(TRUEHD_CEILING_KBPS),
            ),
            None => (stream.codec_name.clone(), AudioBitrate::Unknown),
        };

        Self {
            index: stream.index,
            language: stream.language.clone(),
            codec,
            channels: stream.channels.unwrap_or(0),
            bitrate,
        }
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.language.as_deref() == Some(language)
    }

    pub fn has_codec(&self, codec: &str) -> bool {
        self.codec.as_deref() == Some(codec)
    }

    /// TrueHD may carry Dolby Atmos and is always re-encoded
    pub fn is_truehd(&self) -> bool {
        self.has_codec("truehd")
    }

    pub fn codec_display(&self) -> &str {
        self.codec.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn language_display(&self) -> &str {
        self.language.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn channels_display(&self) -> String {
        display_or_unknown((self.channels > 0).then_some(self.channels))
    }
}

impl fmt::Display for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index: {} | language: {} | codecName: {} | channels: {} | bitRate: {} kb/s",
            self.index,
            self.language_display(),
            self.codec_display(),
            self.channels_display(),
            self.bitrate
        )
    }
}

/// Video stream as seen by the video planner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTrack {
    pub index: usize,
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub display_aspect_ratio: Option<String>,
}

impl VideoTrack {
    pub fn from_descriptor(stream: &StreamDescriptor) -> Self {
        Self {
            index: stream.index,
            codec: stream.codec_name.clone(),
            width: stream.width,
            height: stream.height,
            display_aspect_ratio: stream.display_aspect_ratio.clone(),
        }
    }
}

impl fmt::Display for VideoTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index: {} | codecName: {} | Resolution: {}x{} ({})",
            self.index,
            self.codec.as_deref().unwrap_or(UNKNOWN),
            display_or_unknown(self.width),
            display_or_unknown(self.height),
            self.display_aspect_ratio.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

/// Subtitle stream as seen by the subtitle selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleTrack {
    pub index: usize,
    pub language: Option<String>,
    pub codec: Option<String>,
}

impl SubtitleTrack {
    pub fn from_descriptor(stream: &StreamDescriptor) -> Self {
        Self {
            index: stream.index,
            language: stream.language.clone(),
            codec: stream.codec_name.clone(),
        }
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index: {} | language: {} | codecName: {}",
            self.index,
            self.language.as_deref().unwrap_or(UNKNOWN),
            self.codec.as_deref().unwrap_or(UNKNOWN)
        )
    }
}

/// Complete probe result for one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub format_name: Option<String>,
    /// Overall container bitrate in kb/s
    pub bit_rate_kbps: Option<f64>,
    pub streams: Vec<StreamDescriptor>,
}

impl MediaInfo {
    /// Create media info from probed streams
    pub fn new(path: impl Into<PathBuf>, streams: Vec<StreamDescriptor>) -> Self {
        Self {
            path: path.into(),
            format_name: None,
            bit_rate_kbps: None,
            streams,
        }
    }

    /// Streams of one kind, in probe order
    pub fn streams_of(&self, kind: CodecType) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().filter(move |s| s.codec_type == kind)
    }

    pub fn count_of(&self, kind: CodecType) -> usize {
        self.streams_of(kind).count()
    }

    /// Container bitrate rounded to two decimals, or "unknown"
    pub fn bit_rate_display(&self) -> String {
        match self.bit_rate_kbps {
            Some(kbps) => format!("{:.2}", kbps),
            None => UNKNOWN.to_string(),
        }
    }
}
