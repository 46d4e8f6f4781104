//! Video transform planning

use tracing::debug;

use crate::domain::model::VideoTrack;
use crate::domain::settings::VideoSettings;
use crate::planner::{Scale, VideoPlan};

/// Aspect ratio that never needs forcing
const WIDESCREEN: &str = "16:9";

/// Plan the encode of the selected video track
pub fn plan_video(track: &VideoTrack, settings: &VideoSettings) -> VideoPlan {
    let exceeds = |value: Option<u32>, limit: u32| value.map_or(false, |v| v > limit);
    let downscale = settings.downscale
        && (exceeds(track.width, settings.max_width) || exceeds(track.height, settings.max_height));

    let (scale, output_width, output_height, output_aspect) = if downscale {
        let force_16_9 =
            settings.force_16_9 && track.display_aspect_ratio.as_deref() != Some(WIDESCREEN);
        debug!(
            "Downscaling to {}x{} (force 16:9: {})",
            settings.max_width, settings.max_height, force_16_9
        );
        let aspect = if force_16_9 {
            Some(WIDESCREEN.to_string())
        } else {
            track.display_aspect_ratio.clone()
        };
        (
            Some(Scale {
                width: settings.max_width,
                height: settings.max_height,
                force_16_9,
            }),
            Some(settings.max_width),
            Some(settings.max_height),
            aspect,
        )
    } else {
        (
            None,
            track.width,
            track.height,
            track.display_aspect_ratio.clone(),
        )
    };

    VideoPlan {
        stream_index: track.index,
        codec: settings.codec.clone(),
        preset: settings.preset.clone(),
        crf: settings.crf,
        scale,
        output_width,
        output_height,
        output_aspect,
    }
}
