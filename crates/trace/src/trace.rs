//! Loading and saving whole traces.

use std::path::{Path, PathBuf};

use crate::sample::{parse_samples, serialize_samples, SampleEvent, TraceHeader};

/// A header (when present) plus the samples that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub header: Option<TraceHeader>,
    pub samples: Vec<SampleEvent>,
}

impl Trace {
    pub fn new(header: TraceHeader, samples: Vec<SampleEvent>) -> Self {
        Self {
            header: Some(header),
            samples,
        }
    }

    /// Parse JSONL content.
    ///
    /// A leading `# {...}` line is the header. Any other `#` line is a
    /// comment, so a trace that starts with a plain comment has no header.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let header = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.strip_prefix('#'))
            .map(str::trim_start)
            .filter(|json| json.starts_with('{'))
            .map(serde_json::from_str)
            .transpose()?;
        let samples = parse_samples(content)?;
        Ok(Self { header, samples })
    }

    /// Load and validate a trace file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TraceError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let trace = Self::parse(&content).map_err(|e| TraceError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        trace.validate()?;
        Ok(trace)
    }

    /// Write the trace as JSONL, header first.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let path = path.as_ref();
        let parse_err = |e| TraceError::ParseError {
            path: path.to_path_buf(),
            source: e,
        };

        let mut output = String::new();
        if let Some(header) = &self.header {
            output.push_str("# ");
            output.push_str(&serde_json::to_string(header).map_err(parse_err)?);
            output.push('\n');
        }
        output.push_str(&serialize_samples(&self.samples).map_err(parse_err)?);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TraceError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, output).map_err(|e| TraceError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check that every sample has the same number of axes, matching the
    /// header when there is one.
    pub fn validate(&self) -> Result<(), TraceError> {
        let expected = self
            .header
            .as_ref()
            .map(|h| h.axis_count)
            .or_else(|| self.samples.first().map(|s| s.axes.len()));

        let Some(expected) = expected else {
            return Ok(());
        };
        if expected == 0 {
            return Err(TraceError::ValidationError {
                message: "trace declares zero axes".to_string(),
            });
        }
        if let Some((line, sample)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.axes.len() != expected)
        {
            return Err(TraceError::ValidationError {
                message: format!(
                    "sample {line} has {} axes, expected {expected}",
                    sample.axes.len()
                ),
            });
        }
        Ok(())
    }

    /// Values per sample, from the header or the first sample.
    pub fn axis_count(&self) -> Option<usize> {
        self.header
            .as_ref()
            .map(|h| h.axis_count)
            .or_else(|| self.samples.first().map(|s| s.axes.len()))
    }

    /// Label from the header, if any.
    pub fn label(&self) -> Option<&str> {
        self.header.as_ref().and_then(|h| h.label.as_deref())
    }

    /// Time between first and last sample, in seconds.
    pub fn duration_secs(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_secs() - first.timestamp_secs(),
            _ => 0.0,
        }
    }

    /// Iterate raw axis values, one slice per sample.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        self.samples.iter().map(|s| s.axes.as_slice())
    }
}

/// Errors that can occur when working with trace files.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid trace: {message}")]
    ValidationError { message: String },
}
