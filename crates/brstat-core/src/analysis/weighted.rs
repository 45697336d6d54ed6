use super::{Analyzer, ConditionStatistic, Interval, RunStatistic, condition_statistic};
use crate::log::{BitrateSample, SampleLog, TimestampMs};
use crate::{Error, Result};

/// Intervals must last longer than this to count. Encoders ramp through a
/// few short-lived bitrates before settling.
pub const DEFAULT_STABILITY_THRESHOLD_MS: i64 = 4500;

pub struct WeightedStatsAggregator {
    threshold_ms: i64,
}

impl WeightedStatsAggregator {
    pub fn new(threshold_ms: i64) -> Self {
        Self { threshold_ms }
    }

    /// Replace the stability threshold
    pub fn with_threshold_ms(mut self, threshold_ms: i64) -> Self {
        self.threshold_ms = threshold_ms;
        self
    }

    pub fn threshold_ms(&self) -> i64 {
        self.threshold_ms
    }

    pub fn is_stable(&self, interval: &Interval) -> bool {
        interval.duration_ms > self.threshold_ms
    }

    /// Split the log into one interval per sample
    ///
    /// Each sample lasts until the next one; the last lasts until
    /// `final_timestamp`. A backwards step anywhere is an error.
    pub fn intervals(
        &self,
        samples: &[BitrateSample],
        final_timestamp: TimestampMs,
    ) -> Result<Vec<Interval>> {
        let ends = samples
            .iter()
            .skip(1)
            .map(|s| s.timestamp)
            .chain(std::iter::once(final_timestamp));

        samples
            .iter()
            .zip(ends)
            .enumerate()
            .map(|(index, (sample, end))| {
                let duration_ms = end.millis_since(sample.timestamp);
                if duration_ms < 0 {
                    return Err(Error::NegativeDuration {
                        index,
                        from_ms: sample.timestamp.as_millis(),
                        to_ms: end.as_millis(),
                    });
                }
                Ok(Interval {
                    start: sample.timestamp,
                    duration_ms,
                    value: sample.value,
                })
            })
            .collect()
    }

    /// Weighted mean and standard deviation of one run's stable intervals
    pub fn run_statistic(
        &self,
        samples: &[BitrateSample],
        final_timestamp: TimestampMs,
    ) -> Result<RunStatistic> {
        if samples.is_empty() {
            return Err(Error::EmptySampleSet);
        }

        let intervals = self.intervals(samples, final_timestamp)?;
        let total_intervals = intervals.len();

        let stable: Vec<Interval> = intervals
            .into_iter()
            .filter(|i| self.is_stable(i))
            .collect();

        let stable_duration_ms: i64 = stable.iter().map(|i| i.duration_ms).sum();

        // Zero-length intervals pass a negative threshold but carry no weight
        if stable.is_empty() || stable_duration_ms == 0 {
            return Err(Error::NoQualifyingInterval {
                threshold_ms: self.threshold_ms,
            });
        }

        let weight = stable_duration_ms as f64;

        let weighted_mean = stable
            .iter()
            .map(|i| i.value as f64 * i.duration_ms as f64)
            .sum::<f64>()
            / weight;

        let variance = stable
            .iter()
            .map(|i| i.duration_ms as f64 * (i.value as f64 - weighted_mean).powi(2))
            .sum::<f64>()
            / weight;

        tracing::debug!(
            "Kept {} of {} intervals: mean={:.2}, stddev={:.2}",
            stable.len(),
            total_intervals,
            weighted_mean,
            variance.sqrt()
        );

        Ok(RunStatistic {
            weighted_mean,
            weighted_std_dev: variance.sqrt(),
            total_intervals,
            stable_intervals: stable.len(),
            stable_duration_ms,
        })
    }

    /// Unweighted mean and population standard deviation across runs
    pub fn condition_statistic(&self, runs: &[RunStatistic]) -> Result<ConditionStatistic> {
        condition_statistic(runs)
    }
}

impl Default for WeightedStatsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_STABILITY_THRESHOLD_MS)
    }
}

impl Analyzer for WeightedStatsAggregator {
    type Output = RunStatistic;

    fn analyze(&self, log: &SampleLog) -> Result<Self::Output> {
        self.run_statistic(&log.samples, log.final_timestamp)
    }
}
