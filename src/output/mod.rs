//! Output naming and encode results

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod naming;

/// Bytes per megabyte in size reports
const BYTES_PER_MB: f64 = 1_000_000.0;

/// Size in decimal megabytes
pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Percentage saved by the encode; `None` when either size is zero
pub fn savings_percent(input_bytes: u64, output_bytes: u64) -> Option<f64> {
    if input_bytes == 0 || output_bytes == 0 {
        return None;
    }
    Some(100.0 - (output_bytes as f64 / input_bytes as f64 * 100.0))
}

/// Result of a finished encode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeReport {
    pub destination: PathBuf,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl EncodeReport {
    pub fn savings(&self) -> Option<f64> {
        savings_percent(self.input_bytes, self.output_bytes)
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input size: {:.2} MB", size_mb(self.input_bytes))?;
        writeln!(f, "Output size: {:.2} MB", size_mb(self.output_bytes))?;
        match self.savings() {
            Some(savings) => write!(f, "Savings: {:.2}%", savings),
            None => write!(
                f,
                "Can't calculate savings! Something probably went wrong with the encode."
            ),
        }
    }
}
