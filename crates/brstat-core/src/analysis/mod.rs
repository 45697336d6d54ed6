mod condition;
mod weighted;

pub use condition::condition_statistic;
pub use weighted::{DEFAULT_STABILITY_THRESHOLD_MS, WeightedStatsAggregator};

use crate::log::{SampleLog, TimestampMs};
use std::fmt;

/// The span during which one sample's value was in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: TimestampMs,
    pub duration_ms: i64,
    pub value: i64,
}

/// Duration-weighted bitrate of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStatistic {
    pub weighted_mean: f64,
    pub weighted_std_dev: f64,
    /// Intervals in the log, stable or not
    pub total_intervals: usize,
    /// Intervals longer than the stability threshold
    pub stable_intervals: usize,
    /// Summed duration of the stable intervals
    pub stable_duration_ms: i64,
}

/// Mean and population standard deviation of run means for one condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionStatistic {
    pub mean: f64,
    pub std_dev: f64,
    pub runs: usize,
}

impl fmt::Display for ConditionStatistic {
    /// `mean stddev stddev`, the column layout downstream sheets expect
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {:.2} {:.2}", self.mean, self.std_dev, self.std_dev)
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, log: &SampleLog) -> crate::Result<Self::Output>;
}
