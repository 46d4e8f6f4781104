//! Transcode plan assembly

use std::path::Path;

use tracing::{debug, info};

use crate::domain::model::{display_or_unknown, MediaInfo, VideoTrack, UNKNOWN};
use crate::domain::settings::{AudioMode, Settings};
use crate::output::naming;
use crate::planner::{
    plan_audio, plan_video, AudioOperation, Dispositions, MetadataDirective, TranscodePlan,
};
use crate::streams::{StreamSelection, TrackSelector};

/// Composes selection, planning and naming into a [`TranscodePlan`]
pub struct PlanAssembler<'a> {
    settings: &'a Settings,
}

impl<'a> PlanAssembler<'a> {
    /// Create an assembler bound to a settings snapshot
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the plan for one probed file
    pub fn assemble(&self, media: &MediaInfo) -> TranscodePlan {
        let selection = TrackSelector::new(self.settings).select(media);
        self.assemble_selection(&media.path, selection)
    }

    /// Build the plan from an existing track selection
    pub fn assemble_selection(&self, source: &Path, selection: StreamSelection) -> TranscodePlan {
        let settings = self.settings;

        let video = selection
            .video
            .as_ref()
            .map(|track| plan_video(track, &settings.video));
        let audio = plan_audio(selection.audio.as_ref(), settings.audio_mode());

        let file_name = naming::file_name(
            &naming::base_name(source),
            video.as_ref(),
            &settings.video.codec,
            &audio,
            &settings.file_tag,
        );
        let destination = naming::destination(source, settings.dest_dir(), &file_name);
        debug!("Output file name: {}", file_name);

        let metadata = MetadataDirective {
            strip_container: true,
            audio_language: selection.audio.as_ref().and_then(|a| a.language.clone()),
            subtitle_language: selection
                .subtitle
                .as_ref()
                .and_then(|s| s.track.language.clone()),
            keep_chapters: true,
        };

        let mut plan = TranscodePlan {
            source: source.to_path_buf(),
            destination,
            video,
            audio_track: selection.audio,
            audio,
            subtitle: selection.subtitle,
            dispositions: Dispositions::default(),
            metadata,
            summary: Vec::new(),
        };
        plan.summary = summarize(&plan, selection.video.as_ref(), settings);

        info!("Plan assembled for {}", source.display());
        plan
    }
}

/// Describe the plan the way it is printed before an encode
fn summarize(
    plan: &TranscodePlan,
    input_video: Option<&VideoTrack>,
    settings: &Settings,
) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("-+- Input -+-".to_string());
    if let Some(track) = input_video {
        lines.push(":: Video".to_string());
        lines.push(format!(
            "\t track: {} | {}x{} ({}) | codec: {}",
            track.index,
            display_or_unknown(track.width),
            display_or_unknown(track.height),
            track.display_aspect_ratio.as_deref().unwrap_or(UNKNOWN),
            track.codec.as_deref().unwrap_or(UNKNOWN)
        ));
    }
    if let Some(track) = &plan.audio_track {
        lines.push(":: Audio".to_string());
        lines.push(format!(
            "\t track: {} | language: {} | {} @ {} kb/s ({} ch)",
            track.index,
            track.language_display(),
            track.codec_display(),
            track.bitrate,
            track.channels_display()
        ));
    }
    if let Some(subtitle) = &plan.subtitle {
        lines.push(":: Subtitle".to_string());
        lines.push(format!("\t {}", subtitle.track));
    }

    lines.push("-+- Options -+-".to_string());
    lines.push(format!("\t targLang: {}", settings.target_language));
    if settings.video.downscale {
        lines.push(format!(
            "\t videoDownscale: {}x{} | force16: {}",
            settings.video.max_width, settings.video.max_height, settings.video.force_16_9
        ));
    }
    lines.push(format!(
        "\t preferredAudioFormats: {}",
        settings.audio.preferred_formats.join(" ")
    ));
    match settings.audio_mode() {
        AudioMode::Reencode(reencode) => {
            lines.push(format!(
                "\t audioReenc: {} @ {} (surround, {} ch) / {} (stereo) kb/s",
                reencode.codec,
                reencode.bitrate_surround,
                reencode.channels_surround,
                reencode.bitrate_stereo
            ));
            if reencode.force {
                lines.push("\t audioReencForce: enabled".to_string());
            }
        }
        AudioMode::Downmix(downmix) => lines.push(format!(
            "\t audioDownmix: {} @ {} kb/s ({} ch)",
            downmix.codec, downmix.bitrate, downmix.channels
        )),
        AudioMode::Passthrough => {}
    }
    lines.push(format!("\t fileTag: {}", settings.file_tag));

    lines.push("-+- Output -+-".to_string());
    if let Some(video) = &plan.video {
        let (codec_tag, encoder_tag) = naming::video_codec_tags(&video.codec);
        let format = if codec_tag == naming::UNMAPPED_CODEC_TAG {
            video.codec.clone()
        } else {
            format!("{} / {}", codec_tag, encoder_tag)
        };
        lines.push(":: Video".to_string());
        lines.push(format!(
            "\t {} | preset: {} | crf: {} | {}x{} ({})",
            format,
            video.preset,
            video.crf,
            display_or_unknown(video.output_width),
            display_or_unknown(video.output_height),
            video.output_aspect.as_deref().unwrap_or(UNKNOWN)
        ));
        if settings.video.downscale && video.scale.is_none() {
            lines.push("\t !! Downscaling unnecessary".to_string());
        }
        if settings.video.downscale
            && settings.video.force_16_9
            && !video.scale.map_or(false, |s| s.force_16_9)
        {
            lines.push("\t !! Forcing of 16:9 aspect ratio unnecessary".to_string());
        }
    }

    if let Some(track) = &plan.audio_track {
        let (codec, bitrate, channels) = match &plan.audio.operation {
            AudioOperation::Reencode(target) | AudioOperation::Downmix(target) => (
                target.codec.clone(),
                target.bitrate_kbps.to_string(),
                target
                    .channels
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| track.channels_display()),
            ),
            AudioOperation::Copy | AudioOperation::Drop => (
                track.codec_display().to_string(),
                track.bitrate.to_string(),
                track.channels_display(),
            ),
        };
        lines.push(":: Audio".to_string());
        lines.push(format!(
            "\t language: {} | {} @ {} kb/s ({} ch)",
            track.language_display(),
            codec,
            bitrate,
            channels
        ));
        if plan.audio.operation == AudioOperation::Copy {
            match settings.audio_mode() {
                AudioMode::Reencode(reencode) => lines.push(format!(
                    "\t !! Not reencoding audio because input audio track bitrate ({} kb/s) is either <= target bitrate ({} [surround] / {} [stereo] kb/s) or is unknown",
                    track.bitrate, reencode.bitrate_surround, reencode.bitrate_stereo
                )),
                AudioMode::Downmix(downmix) => lines.push(format!(
                    "\t !! Not downmixing audio because input audio track ({}) is already <= target downmix channels ({})",
                    track.channels_display(),
                    downmix.channels
                )),
                AudioMode::Passthrough => {}
            }
        }
    } else {
        lines.push(":: Audio".to_string());
        lines.push("\t none, audio dropped".to_string());
    }

    if let Some(subtitle) = &plan.subtitle {
        lines.push(":: Subtitle".to_string());
        lines.push(format!(
            "\t language: {} | codec: {}",
            subtitle.track.language.as_deref().unwrap_or(UNKNOWN),
            subtitle.output_codec()
        ));
    }

    lines
}
