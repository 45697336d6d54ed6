use super::types::{BitrateSample, SampleLog, TimestampMs};
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Severity letter of the records carrying bitrate changes
pub const DEFAULT_LEVEL: &str = "I";
/// Logcat tag of the records carrying bitrate changes
pub const DEFAULT_TAG: &str = "ExtendedACodec";
/// Field name printed right before the bitrate value
pub const DEFAULT_FIELD: &str = "int32_t bitrate";

// MM-DD HH:MM:SS.mmm
const HEADER: &str = r"(\d+)-(\d+)\s+(\d+):(\d+):(\d+)\.(\d+)";

lazy_static! {
    static ref HEADER_PATTERN: Regex = Regex::new(HEADER).unwrap();
    static ref DEFAULT_SAMPLE_PATTERN: Regex =
        sample_pattern(DEFAULT_LEVEL, DEFAULT_TAG, DEFAULT_FIELD).unwrap();
}

/// Build the pattern for `MM-DD HH:MM:SS.mmm  PID  TID  LEVEL  TAG:  FIELD = VALUE`
fn sample_pattern(level: &str, tag: &str, field: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"{HEADER}\s+(\d+)\s+(\d+)\s+{}\s+{}:\s+{}\s+=\s+(\d+)",
        regex::escape(level),
        regex::escape(tag),
        regex::escape(field),
    ))
}

/// Pulls bitrate samples and the closing timestamp out of logcat captures
#[derive(Debug, Clone)]
pub struct LogSampleExtractor {
    sample_pattern: Regex,
}

impl Default for LogSampleExtractor {
    fn default() -> Self {
        Self {
            sample_pattern: DEFAULT_SAMPLE_PATTERN.clone(),
        }
    }
}

impl LogSampleExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a different record marker than the `ExtendedACodec` bitrate line
    pub fn with_marker(level: &str, tag: &str, field: &str) -> Result<Self> {
        let sample_pattern = sample_pattern(level, tag, field).map_err(|e| {
            Error::InvalidPattern(format!("Invalid record marker '{} {}: {}': {}", level, tag, field, e))
        })?;
        Ok(Self { sample_pattern })
    }

    /// Read a log file and extract its samples
    pub fn extract_file(&self, path: &Path) -> Result<SampleLog> {
        tracing::debug!("Reading log file from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let log = self.extract_str(&content)?;

        tracing::info!(
            "Extracted {} bitrate samples from {}",
            log.samples.len(),
            path.display()
        );

        Ok(log)
    }

    /// Extract samples from log text
    ///
    /// Lines are searched, not matched whole, so a record may sit anywhere in
    /// a line. The last line must carry a timestamp header; it closes the
    /// interval of the last sample.
    pub fn extract_str(&self, content: &str) -> Result<SampleLog> {
        let mut samples = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            for caps in self.sample_pattern.captures_iter(line) {
                let timestamp = timestamp_from(&caps, idx + 1)?;
                let value = parse_number(&caps[9], idx + 1)?;
                samples.push(BitrateSample { timestamp, value });
            }
        }

        let final_timestamp = final_timestamp(content)?;

        if samples.is_empty() {
            tracing::debug!("No lines matched the bitrate record marker");
        }

        Ok(SampleLog {
            samples,
            final_timestamp,
        })
    }
}

/// Timestamp of the last header on the last line
fn final_timestamp(content: &str) -> Result<TimestampMs> {
    let line_count = content.lines().count();
    let last = content.lines().last().unwrap_or_default();

    match HEADER_PATTERN.captures_iter(last).last() {
        Some(caps) => timestamp_from(&caps, line_count),
        None => Err(Error::MalformedTrailer {
            line: last.to_string(),
        }),
    }
}

// Groups 3..=6 hold hour, minute, second and millisecond in both patterns.
fn timestamp_from(caps: &Captures<'_>, line: usize) -> Result<TimestampMs> {
    TimestampMs::from_hms_milli(
        parse_number(&caps[3], line)?,
        parse_number(&caps[4], line)?,
        parse_number(&caps[5], line)?,
        parse_number(&caps[6], line)?,
    )
    .ok_or_else(|| Error::InvalidValue {
        line,
        value: format!("{}:{}:{}.{}", &caps[3], &caps[4], &caps[5], &caps[6]),
    })
}

fn parse_number(digits: &str, line: usize) -> Result<i64> {
    digits.parse().map_err(|_| Error::InvalidValue {
        line,
        value: digits.to_string(),
    })
}
