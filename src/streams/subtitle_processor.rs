//! Subtitle stream selection and handling
//!
//! The first subtitle in the target language is kept. Bitmap formats cannot be
//! converted to text, so they are stream-copied; everything else becomes ASS.

use serde::Serialize;
use tracing::info;

use crate::domain::model::SubtitleTrack;
use crate::domain::settings::Settings;

/// Subtitle codecs that are images rather than text
const BITMAP_CODECS: [&str; 2] = ["hdmv_pgs_subtitle", "dvd_subtitle"];

/// How the selected subtitle reaches the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleMode {
    /// Bitmap subtitles, copied as-is
    Copy,
    /// Text subtitles, converted to Advanced SubStation Alpha
    ConvertToAss,
}

impl SubtitleMode {
    /// Decide the handling from the subtitle codec
    pub fn for_codec(codec: Option<&str>) -> Self {
        match codec {
            Some(codec) if BITMAP_CODECS.contains(&codec) => SubtitleMode::Copy,
            _ => SubtitleMode::ConvertToAss,
        }
    }

    /// Value passed to the encoder's `-c:s`
    pub fn encoder_arg(&self) -> &'static str {
        match self {
            SubtitleMode::Copy => "copy",
            SubtitleMode::ConvertToAss => "ass",
        }
    }
}

/// Subtitle carried into the output together with its handling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleSelection {
    pub track: SubtitleTrack,
    pub mode: SubtitleMode,
}

impl SubtitleSelection {
    pub fn new(track: SubtitleTrack) -> Self {
        let mode = SubtitleMode::for_codec(track.codec.as_deref());
        Self { track, mode }
    }

    /// Codec name of the subtitle once written to the output
    pub fn output_codec(&self) -> &str {
        match self.mode {
            SubtitleMode::Copy => self.track.codec.as_deref().unwrap_or("copy"),
            SubtitleMode::ConvertToAss => "ass",
        }
    }
}

/// Subtitle stream selector
pub struct SubtitleProcessor<'a> {
    target_language: &'a str,
}

impl<'a> SubtitleProcessor<'a> {
    pub fn new(target_language: &'a str) -> Self {
        Self { target_language }
    }

    pub fn from_settings(settings: &'a Settings) -> Self {
        Self::new(&settings.target_language)
    }

    /// Keep the first candidate tagged with the target language
    pub fn select(&self, candidates: &[SubtitleTrack]) -> Option<SubtitleSelection> {
        let found = candidates
            .iter()
            .find(|track| track.language.as_deref() == Some(self.target_language))
            .cloned()
            .map(SubtitleSelection::new);

        match &found {
            Some(selection) => info!(
                "Subtitle track chosen: {} ({})",
                selection.track,
                match selection.mode {
                    SubtitleMode::Copy => "copy",
                    SubtitleMode::ConvertToAss => "convert to ass",
                }
            ),
            None => info!("No {} subtitle track found", self.target_language),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CodecType, StreamDescriptor};

    fn subtitle(index: usize, codec: &str, language: Option<&str>) -> SubtitleTrack {
        let mut stream = StreamDescriptor::new(index, CodecType::Subtitle).with_codec(codec);
        if let Some(language) = language {
            stream = stream.with_language(language);
        }
        SubtitleTrack::from_descriptor(&stream)
    }

    #[test]
    fn test_bitmap_codecs_are_copied() {
        assert_eq!(
            SubtitleMode::for_codec(Some("hdmv_pgs_subtitle")),
            SubtitleMode::Copy
        );
        assert_eq!(SubtitleMode::for_codec(Some("dvd_subtitle")), SubtitleMode::Copy);
        assert_eq!(
            SubtitleMode::for_codec(Some("subrip")),
            SubtitleMode::ConvertToAss
        );
        assert_eq!(SubtitleMode::for_codec(None), SubtitleMode::ConvertToAss);
    }

    #[test]
    fn test_first_target_language_match_wins() {
        let candidates = vec![
            subtitle(3, "subrip", Some("fre")),
            subtitle(4, "hdmv_pgs_subtitle", Some("eng")),
            subtitle(5, "subrip", Some("eng")),
        ];

        let selection = SubtitleProcessor::new("eng").select(&candidates).unwrap();
        assert_eq!(selection.track.index, 4);
        assert_eq!(selection.mode, SubtitleMode::Copy);
        assert_eq!(selection.output_codec(), "hdmv_pgs_subtitle");
    }

    #[test]
    fn test_untagged_subtitles_are_not_selected() {
        let candidates = vec![subtitle(2, "subrip", None), subtitle(3, "ass", Some("ger"))];
        assert!(SubtitleProcessor::new("eng").select(&candidates).is_none());
    }

    #[test]
    fn test_text_subtitle_converted() {
        let selection = SubtitleProcessor::new("eng")
            .select(&[subtitle(2, "mov_text", Some("eng"))])
            .unwrap();
        assert_eq!(selection.mode.encoder_arg(), "ass");
        assert_eq!(selection.output_codec(), "ass");
    }
}
