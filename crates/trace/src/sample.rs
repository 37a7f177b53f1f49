//! Sample types for the uwave trace stream.
//!
//! Samples are stored in append-only JSONL, one reading per line. A trace
//! may start with a `# {header}` comment line describing the recording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since recording start.
pub type TimestampNs = u64;

/// Current trace schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// A single raw accelerometer reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleEvent {
    /// Monotonic nanoseconds since recording start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// One raw value per axis, in axis order.
    pub axes: Vec<i32>,
}

/// Recording metadata written as the first line of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Values per sample.
    pub axis_count: usize,

    /// Nominal sampling rate (Hz).
    pub sample_rate_hz: u32,

    /// Wall-clock time the recording started.
    pub recorded_at: DateTime<Utc>,

    /// Free-form name of the motion, e.g. "circle".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SampleEvent {
    pub fn new(timestamp_ns: TimestampNs, axes: Vec<i32>) -> Self {
        Self { timestamp_ns, axes }
    }

    /// Timestamp as fractional seconds since recording start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

impl TraceHeader {
    /// Header for a recording starting now.
    pub fn new(axis_count: usize, sample_rate_hz: u32) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            axis_count,
            sample_rate_hz,
            recorded_at: Utc::now(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Parse samples from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_samples(jsonl: &str) -> Result<Vec<SampleEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[SampleEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}
