//! Output file naming
//!
//! Output names follow the scene convention
//! `{base}.{res}.{codec}.{encoder}.{channels}ch.{audio}{tag}.mkv`. Values that
//! cannot be mapped fall back to placeholders; naming never fails.

use std::path::{Path, PathBuf};

use crate::domain::model::UNKNOWN;
use crate::planner::{AudioPlan, VideoPlan};

/// Output container extension
pub const CONTAINER_EXTENSION: &str = "mkv";

/// Placeholder tags for video codecs without a known mapping
pub const UNMAPPED_CODEC_TAG: &str = "tagCodec";
pub const UNMAPPED_ENCODER_TAG: &str = "tagEncoder";

/// Audio tag used when the output has no audio
pub const NO_AUDIO_TAG: &str = "NONE";

/// Resolution tag from the output dimensions
pub fn resolution_tag(width: Option<u32>, height: Option<u32>) -> String {
    if width == Some(1920) {
        "1080p".to_string()
    } else if height == Some(1280) {
        // Matches on height 1280, not width
        "720p".to_string()
    } else {
        match height {
            Some(height) => format!("{}p", height),
            None => format!("{}p", UNKNOWN),
        }
    }
}

/// Format and encoder tags of an ffmpeg video encoder
pub fn video_codec_tags(codec: &str) -> (&'static str, &'static str) {
    match codec {
        "libx265" => ("HEVC", "x265"),
        "libx264" => ("AVC", "x264"),
        _ => (UNMAPPED_CODEC_TAG, UNMAPPED_ENCODER_TAG),
    }
}

/// Upper-cased audio tag, with encoder names mapped to their format
pub fn audio_codec_tag(codec: &str) -> String {
    let format = match codec {
        "libopus" => "OPUS",
        "libvorbis" | "vorbis" => "OGG",
        "libfdk_aac" => "AAC",
        "libmp3lame" => "MP3",
        "libtwolame" | "mp2" => "MP2",
        "wmav1" | "wmav2" => "WMA",
        other => other,
    };
    format.to_uppercase()
}

/// Remove every character outside `[A-Za-z0-9._-]`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Build the sanitized output file name
pub fn file_name(
    base: &str,
    video: Option<&VideoPlan>,
    video_codec: &str,
    audio: &AudioPlan,
    file_tag: &str,
) -> String {
    let resolution = resolution_tag(
        video.and_then(|v| v.output_width),
        video.and_then(|v| v.output_height),
    );
    let (codec_tag, encoder_tag) = video_codec_tags(video_codec);

    let (channels, audio_tag) = if audio.is_dropped() {
        ("0".to_string(), NO_AUDIO_TAG.to_string())
    } else {
        // Unknown channel counts stay numeric (0) in the name
        (
            audio.channels.to_string(),
            audio_codec_tag(audio.codec_tag.as_deref().unwrap_or(UNKNOWN)),
        )
    };

    sanitize(&format!(
        "{}.{}.{}.{}.{}ch.{}{}.{}",
        base,
        resolution,
        codec_tag,
        encoder_tag,
        channels,
        audio_tag,
        file_tag,
        CONTAINER_EXTENSION
    ))
}

/// Input file name without its extension
pub fn base_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path: the destination directory when set, else next to the input
pub fn destination(source: &Path, dest_dir: Option<&Path>, file_name: &str) -> PathBuf {
    let directory = match dest_dir {
        Some(dir) => dir,
        None => source.parent().unwrap_or_else(|| Path::new(".")),
    };
    directory.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{AudioOperation, AudioTarget};

    fn video_plan(width: u32, height: u32) -> VideoPlan {
        VideoPlan {
            stream_index: 0,
            codec: "libx265".to_string(),
            preset: "medium".to_string(),
            crf: 22,
            scale: None,
            output_width: Some(width),
            output_height: Some(height),
            output_aspect: None,
        }
    }

    fn copied(codec: &str, channels: u32) -> AudioPlan {
        AudioPlan {
            operation: AudioOperation::Copy,
            codec_tag: Some(codec.to_string()),
            channels,
        }
    }

    #[test]
    fn test_resolution_tags() {
        assert_eq!(resolution_tag(Some(1920), Some(800)), "1080p");
        assert_eq!(resolution_tag(Some(720), Some(1280)), "720p");
        assert_eq!(resolution_tag(Some(1280), Some(720)), "720p");
        assert_eq!(resolution_tag(Some(720), Some(480)), "480p");
        assert_eq!(resolution_tag(None, None), "unknownp");
    }

    #[test]
    fn test_video_codec_tags() {
        assert_eq!(video_codec_tags("libx265"), ("HEVC", "x265"));
        assert_eq!(video_codec_tags("libx264"), ("AVC", "x264"));
        assert_eq!(video_codec_tags("libsvtav1"), ("tagCodec", "tagEncoder"));
    }

    #[test]
    fn test_audio_codec_synonyms() {
        assert_eq!(audio_codec_tag("libopus"), "OPUS");
        assert_eq!(audio_codec_tag("vorbis"), "OGG");
        assert_eq!(audio_codec_tag("libfdk_aac"), "AAC");
        assert_eq!(audio_codec_tag("mp2"), "MP2");
        assert_eq!(audio_codec_tag("wmav1"), "WMA");
        assert_eq!(audio_codec_tag("eac3"), "EAC3");
        assert_eq!(audio_codec_tag("dts-hd ma"), "DTS-HD MA");
    }

    #[test]
    fn test_sanitize_removes_disallowed_characters() {
        assert_eq!(sanitize("Movie (2018)!.mkv"), "Movie2018.mkv");
        assert_eq!(sanitize("a b_c-d.e"), "ab_c-d.e");
        assert_eq!(sanitize("Amélie.DTS-HD MA"), "Amlie.DTS-HDMA");
    }

    #[test]
    fn test_file_name_for_surround_copy() {
        let name = file_name(
            "The Movie (2018)",
            Some(&video_plan(1920, 800)),
            "libx265",
            &copied("eac3", 6),
            "-myTag",
        );
        assert_eq!(name, "TheMovie2018.1080p.HEVC.x265.6ch.EAC3-myTag.mkv");
    }

    #[test]
    fn test_file_name_for_downmix_and_dropped_audio() {
        let downmix = AudioPlan {
            operation: AudioOperation::Downmix(AudioTarget {
                codec: "libfdk_aac".to_string(),
                bitrate_kbps: 256,
                channels: Some(2),
            }),
            codec_tag: Some("libfdk_aac".to_string()),
            channels: 2,
        };
        let name = file_name("show", Some(&video_plan(1280, 720)), "libx264", &downmix, "");
        assert_eq!(name, "show.720p.AVC.x264.2ch.AAC.mkv");

        let name = file_name("clip", None, "libx265", &AudioPlan::drop_audio(), "-x");
        assert_eq!(name, "clip.unknownp.HEVC.x265.0ch.NONE-x.mkv");
    }

    #[test]
    fn test_unknown_channel_count_is_zero_in_name() {
        let name = file_name(
            "x",
            Some(&video_plan(1920, 1080)),
            "libx265",
            &copied("aac", 0),
            "-myTag",
        );
        assert_eq!(name, "x.1080p.HEVC.x265.0ch.AAC-myTag.mkv");
    }

    #[test]
    fn test_destination_directory() {
        let source = Path::new("/media/movies/film.mkv");
        assert_eq!(
            destination(source, None, "out.mkv"),
            PathBuf::from("/media/movies/out.mkv")
        );
        assert_eq!(
            destination(source, Some(Path::new("/srv/encodes")), "out.mkv"),
            PathBuf::from("/srv/encodes/out.mkv")
        );
        assert_eq!(base_name(source), "film");
    }
}
