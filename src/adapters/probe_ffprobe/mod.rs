//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -v quiet -print_format json -show_format -show_streams` and maps
//! the JSON document onto [`MediaInfo`]. Numeric fields that ffprobe prints as
//! strings are parsed leniently; anything unparsable becomes `None`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::{CodecType, MediaInfo, StreamDescriptor};
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FFprobeAdapter {
    /// Create an adapter that runs `ffprobe` from `PATH`
    pub fn new() -> Self {
        Self::with_binary("ffprobe")
    }

    pub fn with_binary(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaInfo, DomainError> {
        debug!("Running {} on {}", self.ffprobe_path.display(), path.display());

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DomainError::ProbeFail(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe exited with {} for {}",
                output.status,
                path.display()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(path, &json)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: Option<usize>,
    codec_type: Option<String>,
    codec_name: Option<String>,
    profile: Option<String>,
    channels: Option<u32>,
    bit_rate: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    display_aspect_ratio: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
}

/// Map ffprobe JSON onto the stream model
pub fn parse_probe_output(path: &Path, json: &str) -> Result<MediaInfo, DomainError> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFail(format!("ffprobe JSON parse error: {}", e)))?;

    let streams = output
        .streams
        .into_iter()
        .enumerate()
        .map(|(position, stream)| StreamDescriptor {
            index: stream.index.unwrap_or(position),
            codec_type: CodecType::parse(stream.codec_type.as_deref().unwrap_or_default()),
            codec_name: stream.codec_name,
            language: stream.tags.language,
            channels: stream.channels,
            bit_rate_kbps: stream
                .bit_rate
                .as_deref()
                .and_then(|b| b.trim().parse::<u64>().ok())
                .and_then(|bps| u32::try_from(bps / 1000).ok()),
            width: stream.width,
            height: stream.height,
            display_aspect_ratio: stream.display_aspect_ratio,
            profile: stream.profile,
        })
        .collect();

    let mut media = MediaInfo::new(path, streams);
    media.format_name = output.format.format_name;
    media.bit_rate_kbps = output
        .format
        .bit_rate
        .as_deref()
        .and_then(|b| b.trim().parse::<f64>().ok())
        .map(|bps| bps / 1000.0);

    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": 1920,
                "height": 800,
                "display_aspect_ratio": "12:5"
            },
            {
                "index": 1,
                "codec_name": "dts",
                "profile": "DTS-HD MA",
                "codec_type": "audio",
                "channels": 8,
                "tags": { "language": "eng", "title": "Surround 7.1" }
            },
            {
                "index": 2,
                "codec_name": "ac3",
                "codec_type": "audio",
                "channels": 6,
                "bit_rate": "640999",
                "tags": { "language": "eng" }
            },
            {
                "index": 3,
                "codec_name": "subrip",
                "codec_type": "subtitle",
                "tags": { "language": "fre" }
            },
            {
                "index": 4,
                "codec_type": "attachment",
                "tags": { "filename": "font.ttf" }
            }
        ],
        "format": {
            "filename": "movie.mkv",
            "format_name": "matroska,webm",
            "bit_rate": "12345678"
        }
    }"#;

    #[test]
    fn test_parse_fixture() {
        let media = parse_probe_output(Path::new("/media/movie.mkv"), FIXTURE).unwrap();

        assert_eq!(media.streams.len(), 5);
        assert_eq!(media.format_name.as_deref(), Some("matroska,webm"));
        assert_eq!(media.bit_rate_display(), "12345.68");
        assert_eq!(media.count_of(CodecType::Audio), 2);
        assert_eq!(media.streams[4].codec_type, CodecType::Other);

        let video = &media.streams[0];
        assert_eq!(video.width, Some(1920));
        assert_eq!(video.display_aspect_ratio.as_deref(), Some("12:5"));

        let dts = &media.streams[1];
        assert_eq!(dts.profile.as_deref(), Some("DTS-HD MA"));
        assert!(dts.bit_rate_kbps.is_none());
        assert_eq!(dts.language.as_deref(), Some("eng"));

        // Truncating division of the bit/s value
        assert_eq!(media.streams[2].bit_rate_kbps, Some(640));
    }

    #[test]
    fn test_missing_index_falls_back_to_position() {
        let json = r#"{"streams": [{"codec_type": "video"}, {"codec_type": "audio", "bit_rate": "N/A"}]}"#;
        let media = parse_probe_output(Path::new("a.mkv"), json).unwrap();

        assert_eq!(media.streams[1].index, 1);
        assert!(media.streams[1].bit_rate_kbps.is_none());
        assert!(media.bit_rate_kbps.is_none());
        assert_eq!(media.bit_rate_display(), "unknown");
    }

    #[test]
    fn test_invalid_json_is_probe_failure() {
        let err = parse_probe_output(Path::new("a.mkv"), "not json").unwrap_err();
        assert!(matches!(err, DomainError::ProbeFail(_)));
    }
}
