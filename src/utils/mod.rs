//! Common utilities and helpers

pub mod logging;

use std::time::Duration;

use chrono::{DateTime, Local};

/// Timestamp format used in run summaries
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// Utility functions for vidchew
pub struct Utils;

impl Utils {
    /// Format a run duration: seconds, or minutes past one minute
    pub fn format_duration(duration: Duration) -> String {
        let seconds = duration.as_secs_f64();
        if seconds > 60.0 {
            format!("{:.2} min", seconds / 60.0)
        } else {
            format!("{:.2} sec", seconds)
        }
    }

    pub fn format_timestamp(time: &DateTime<Local>) -> String {
        time.format(TIMESTAMP_FORMAT).to_string()
    }
}
