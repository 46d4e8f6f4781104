//! vidchew library
//!
//! Recursive batch video re-encoder: probes every file under a directory with
//! ffprobe, picks video, audio and subtitle tracks by policy and re-encodes to
//! Matroska with ffmpeg.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{AudioTrack, MediaInfo, SubtitleTrack, VideoTrack};
pub use domain::settings::Settings;
pub use error::{VidchewError, VidchewResult};
pub use planner::TranscodePlan;
