//! Audio stream selection logic
//!
//! With a single audio stream there is nothing to decide. With several, a deep
//! search folds a running "best" over every preferred format and, for each
//! format, over every audio stream. A stream only replaces the best when it has
//! strictly more channels, so earlier formats win ties and a later pass can only
//! take over with a richer track. The best found so far is never reset between
//! passes.

use tracing::{debug, info};

use crate::domain::model::AudioTrack;
use crate::domain::settings::Settings;

/// Audio stream selector
pub struct AudioMapper<'a> {
    target_language: &'a str,
    preferred_formats: &'a [String],
}

impl<'a> AudioMapper<'a> {
    /// Create a new audio mapper
    pub fn new(target_language: &'a str, preferred_formats: &'a [String]) -> Self {
        Self {
            target_language,
            preferred_formats,
        }
    }

    pub fn from_settings(settings: &'a Settings) -> Self {
        Self::new(&settings.target_language, &settings.audio.preferred_formats)
    }

    /// Select one audio track out of the candidates, in ascending index order
    pub fn select(&self, candidates: &[AudioTrack]) -> Option<AudioTrack> {
        let chosen = match candidates {
            [] => {
                info!("No audio tracks found");
                return None;
            }
            [only] => {
                info!("Only one audio track found, choosing...");
                Some(only.clone())
            }
            _ => {
                info!("Multiple audio tracks found, deep searching...");
                self.deep_search(candidates)
            }
        };

        match &chosen {
            Some(track) => info!("Audio track chosen: {}", track),
            None => info!("No audio track found"),
        }
        chosen
    }

    fn deep_search(&self, candidates: &[AudioTrack]) -> Option<AudioTrack> {
        let language_present = candidates
            .iter()
            .any(|track| track.has_language(self.target_language));

        let mut best: Option<&AudioTrack> = None;

        for format in self.preferred_formats {
            for track in candidates {
                let best_channels = best.map_or(0, |b| b.channels);
                debug!(format = %format, "{}", track);

                if self.qualifies(format, track, best_channels, language_present) {
                    debug!(index = track.index, "This is the best found audio track");
                    best = Some(track);
                }
            }
        }

        best.cloned()
    }

    /// Whether `track` beats a best with `best_channels` during the pass for `format`
    fn qualifies(
        &self,
        format: &str,
        track: &AudioTrack,
        best_channels: u32,
        language_present: bool,
    ) -> bool {
        if track.channels <= best_channels {
            return false;
        }

        if format.is_empty() {
            // Language only stops mattering when no stream carries it
            !language_present || track.has_language(self.target_language)
        } else {
            track.has_language(self.target_language) && track.has_codec(format)
        }
    }
}
