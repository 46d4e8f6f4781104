//! Track selection
//!
//! Picks at most one video, one audio and one subtitle stream from a probed
//! container. The selection only reads the probe result and the settings; it
//! never fails, an absent track is reported as `None`.

use serde::Serialize;
use tracing::info;

use crate::domain::model::{
    AudioTrack, CodecType, MediaInfo, StreamDescriptor, SubtitleTrack, VideoTrack,
};
use crate::domain::settings::Settings;

pub mod audio_mapper;
pub mod subtitle_processor;

pub use audio_mapper::AudioMapper;
pub use subtitle_processor::{SubtitleMode, SubtitleProcessor, SubtitleSelection};

/// Tracks carried into the output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSelection {
    pub video: Option<VideoTrack>,
    pub audio: Option<AudioTrack>,
    pub subtitle: Option<SubtitleSelection>,
}

/// Selects the tracks of one input under the configured policy
pub struct TrackSelector<'a> {
    settings: &'a Settings,
}

impl<'a> TrackSelector<'a> {
    /// Create a selector bound to a settings snapshot
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Run video, audio and subtitle selection
    pub fn select(&self, media: &MediaInfo) -> StreamSelection {
        let video = Self::select_video(media);
        match &video {
            Some(track) => info!("Chose first video track: {}", track),
            None => info!("No video track found"),
        }

        let audio_candidates: Vec<AudioTrack> = ordered(media, CodecType::Audio)
            .into_iter()
            .map(AudioTrack::from_descriptor)
            .collect();
        info!("Number of audio streams: {}", audio_candidates.len());
        for track in &audio_candidates {
            info!("\t {}", track);
        }
        let audio = AudioMapper::from_settings(self.settings).select(&audio_candidates);

        let subtitle_candidates: Vec<SubtitleTrack> = ordered(media, CodecType::Subtitle)
            .into_iter()
            .map(SubtitleTrack::from_descriptor)
            .collect();
        info!("Number of subtitle streams: {}", subtitle_candidates.len());
        for track in &subtitle_candidates {
            info!("\t {}", track);
        }
        let subtitle = SubtitleProcessor::from_settings(self.settings).select(&subtitle_candidates);

        StreamSelection {
            video,
            audio,
            subtitle,
        }
    }

    /// The first video stream wins; there is no scoring
    pub fn select_video(media: &MediaInfo) -> Option<VideoTrack> {
        ordered(media, CodecType::Video)
            .first()
            .map(|stream| VideoTrack::from_descriptor(stream))
    }
}

/// Streams of one kind in ascending index order
fn ordered(media: &MediaInfo, kind: CodecType) -> Vec<&StreamDescriptor> {
    let mut streams: Vec<&StreamDescriptor> = media.streams_of(kind).collect();
    streams.sort_by_key(|s| s.index);
    streams
}
