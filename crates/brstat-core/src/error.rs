use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Last line has no timestamp header: {line:?}")]
    MalformedTrailer { line: String },

    #[error("No bitrate samples found")]
    EmptySampleSet,

    #[error("No interval lasted longer than {threshold_ms} ms")]
    NoQualifyingInterval { threshold_ms: i64 },

    #[error("Interval {index} runs backwards: {from_ms} ms -> {to_ms} ms")]
    NegativeDuration {
        index: usize,
        from_ms: i64,
        to_ms: i64,
    },

    #[error("Run folder not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Invalid value on line {line}: {value}")]
    InvalidValue { line: usize, value: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to parse sweep file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("No run statistics to aggregate")]
    NoRuns,
}

impl Error {
    /// True for the errors that mean a log carried no usable bitrate data.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            Error::EmptySampleSet | Error::NoQualifyingInterval { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
