//! Audio transform planning

use tracing::debug;

use crate::domain::model::AudioTrack;
use crate::domain::settings::{AudioMode, DownmixSettings, ReencodeSettings};
use crate::planner::{AudioOperation, AudioPlan, AudioTarget};

/// Decide what to do with the selected audio track
pub fn plan_audio(track: Option<&AudioTrack>, mode: AudioMode<'_>) -> AudioPlan {
    let Some(track) = track else {
        return AudioPlan::drop_audio();
    };

    match mode {
        AudioMode::Passthrough => copy(track),
        AudioMode::Reencode(reencode) => plan_reencode(track, reencode),
        AudioMode::Downmix(downmix) => plan_downmix(track, downmix),
    }
}

fn copy(track: &AudioTrack) -> AudioPlan {
    AudioPlan {
        operation: AudioOperation::Copy,
        codec_tag: track.codec.clone(),
        channels: track.channels,
    }
}

fn transform(target: AudioTarget, input_channels: u32, downmix: bool) -> AudioPlan {
    let codec_tag = Some(target.codec.clone());
    let channels = target.channels.unwrap_or(input_channels);
    let operation = if downmix {
        AudioOperation::Downmix(target)
    } else {
        AudioOperation::Reencode(target)
    };
    AudioPlan {
        operation,
        codec_tag,
        channels,
    }
}

fn surround_target(reencode: &ReencodeSettings) -> AudioTarget {
    AudioTarget {
        codec: reencode.codec.clone(),
        bitrate_kbps: reencode.bitrate_surround,
        channels: Some(reencode.channels_surround),
    }
}

fn plan_reencode(track: &AudioTrack, reencode: &ReencodeSettings) -> AudioPlan {
    // TrueHD overrides every other rule
    if track.is_truehd() {
        debug!("TrueHD audio is always re-encoded");
        return transform(surround_target(reencode), track.channels, false);
    }

    let bitrate = track.bitrate.kbps();
    if bitrate == 0 {
        debug!("The input bitrate is 0/unknown");
        return copy(track);
    }

    if track.channels > 2 {
        if !reencode.force && bitrate <= reencode.bitrate_surround {
            debug!(
                "The input bitrate ({}) is <= the desired bitrate ({}) (surround)",
                bitrate, reencode.bitrate_surround
            );
            return copy(track);
        }
        transform(surround_target(reencode), track.channels, false)
    } else {
        if !reencode.force && bitrate <= reencode.bitrate_stereo {
            debug!(
                "The input bitrate ({}) is <= the desired bitrate ({}) (stereo)",
                bitrate, reencode.bitrate_stereo
            );
            return copy(track);
        }
        let target = AudioTarget {
            codec: reencode.codec.clone(),
            bitrate_kbps: reencode.bitrate_stereo,
            channels: None,
        };
        transform(target, track.channels, false)
    }
}

fn plan_downmix(track: &AudioTrack, downmix: &DownmixSettings) -> AudioPlan {
    if track.channels <= downmix.channels {
        debug!(
            "Input channels ({}) already <= downmix channels ({})",
            track.channels, downmix.channels
        );
        return copy(track);
    }

    let target = AudioTarget {
        codec: downmix.codec.clone(),
        bitrate_kbps: downmix.bitrate,
        channels: Some(downmix.channels),
    };
    transform(target, track.channels, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CodecType, StreamDescriptor};
    use crate::domain::settings::Settings;

    fn audio(codec: &str, channels: u32, kbps: Option<u32>) -> AudioTrack {
        let mut stream = StreamDescriptor::new(1, CodecType::Audio)
            .with_codec(codec)
            .with_language("eng")
            .with_channels(channels);
        if let Some(kbps) = kbps {
            stream = stream.with_bit_rate_kbps(kbps);
        }
        AudioTrack::from_descriptor(&stream)
    }

    #[test]
    fn test_no_track_drops_audio() {
        let settings = Settings::default();
        let plan = plan_audio(None, settings.audio_mode());
        assert!(plan.is_dropped());
        assert_eq!(plan.channels, 0);
        assert!(plan.codec_tag.is_none());
    }

    #[test]
    fn test_surround_bitrate_boundary() {
        let settings = Settings::default();

        let at_target = plan_audio(Some(&audio("ac3", 6, Some(640))), settings.audio_mode());
        assert_eq!(at_target.operation, AudioOperation::Copy);
        assert_eq!(at_target.codec_tag.as_deref(), Some("ac3"));
        assert_eq!(at_target.channels, 6);

        let above = plan_audio(Some(&audio("eac3", 6, Some(641))), settings.audio_mode());
        assert_eq!(
            above.operation,
            AudioOperation::Reencode(AudioTarget {
                codec: "ac3".to_string(),
                bitrate_kbps: 640,
                channels: Some(6),
            })
        );
        assert_eq!(above.codec_tag.as_deref(), Some("ac3"));
    }

    #[test]
    fn test_truehd_always_reencoded() {
        let mut settings = Settings::default();
        settings.audio.reencode.channels_surround = 8;

        let plan = plan_audio(Some(&audio("truehd", 8, None)), settings.audio_mode());
        match &plan.operation {
            AudioOperation::Reencode(target) => {
                assert_eq!(target.bitrate_kbps, 640);
                assert_eq!(target.channels, Some(8));
            }
            other => panic!("expected re-encode, got {:?}", other),
        }

        // Even a low measured bitrate does not allow a copy
        let plan = plan_audio(Some(&audio("truehd", 2, Some(128))), settings.audio_mode());
        assert!(matches!(plan.operation, AudioOperation::Reencode(_)));
        assert_eq!(plan.channels, 8);
    }

    #[test]
    fn test_stereo_reencode_keeps_channels() {
        let settings = Settings::default();

        let plan = plan_audio(Some(&audio("flac", 2, Some(900))), settings.audio_mode());
        assert_eq!(
            plan.operation,
            AudioOperation::Reencode(AudioTarget {
                codec: "ac3".to_string(),
                bitrate_kbps: 256,
                channels: None,
            })
        );
        assert_eq!(plan.channels, 2);

        let plan = plan_audio(Some(&audio("aac", 2, Some(256))), settings.audio_mode());
        assert_eq!(plan.operation, AudioOperation::Copy);
    }

    #[test]
    fn test_unknown_bitrate_is_copied() {
        let settings = Settings::default();
        let plan = plan_audio(Some(&audio("dts", 6, None)), settings.audio_mode());
        assert_eq!(plan.operation, AudioOperation::Copy);
        assert_eq!(plan.codec_tag.as_deref(), Some("dts"));
    }

    #[test]
    fn test_force_reencodes_low_bitrates() {
        let mut settings = Settings::default();
        settings.audio.reencode.force = true;

        let surround = plan_audio(Some(&audio("ac3", 6, Some(384))), settings.audio_mode());
        assert!(matches!(surround.operation, AudioOperation::Reencode(_)));

        let stereo = plan_audio(Some(&audio("aac", 2, Some(96))), settings.audio_mode());
        assert!(matches!(stereo.operation, AudioOperation::Reencode(_)));
    }

    #[test]
    fn test_downmix_mode() {
        let mut settings = Settings::default();
        settings.audio.reencode.enabled = false;
        settings.audio.downmix.enabled = true;

        let plan = plan_audio(Some(&audio("dts", 6, Some(1509))), settings.audio_mode());
        assert_eq!(
            plan.operation,
            AudioOperation::Downmix(AudioTarget {
                codec: "libfdk_aac".to_string(),
                bitrate_kbps: 256,
                channels: Some(2),
            })
        );
        assert_eq!(plan.codec_tag.as_deref(), Some("libfdk_aac"));
        assert_eq!(plan.channels, 2);

        let stereo = plan_audio(Some(&audio("aac", 2, Some(320))), settings.audio_mode());
        assert_eq!(stereo.operation, AudioOperation::Copy);
    }

    #[test]
    fn test_passthrough_copies() {
        let mut settings = Settings::default();
        settings.audio.reencode.enabled = false;

        let plan = plan_audio(Some(&audio("truehd", 8, None)), settings.audio_mode());
        assert_eq!(plan.operation, AudioOperation::Copy);
        assert_eq!(plan.codec_tag.as_deref(), Some("truehd"));
        assert_eq!(plan.channels, 8);
    }
}
