use super::{ConditionStatistic, RunStatistic};
use crate::{Error, Result};

/// Reduce repeated runs of one condition to the mean of their weighted means
///
/// Every run counts once regardless of its length. The standard deviation is
/// the population one (divides by `n`).
pub fn condition_statistic(runs: &[RunStatistic]) -> Result<ConditionStatistic> {
    if runs.is_empty() {
        return Err(Error::NoRuns);
    }

    let n = runs.len() as f64;
    let mean = runs.iter().map(|r| r.weighted_mean).sum::<f64>() / n;
    let variance = runs
        .iter()
        .map(|r| (r.weighted_mean - mean).powi(2))
        .sum::<f64>()
        / n;

    tracing::debug!(
        "Condition over {} runs: mean={:.2}, stddev={:.2}",
        runs.len(),
        mean,
        variance.sqrt()
    );

    Ok(ConditionStatistic {
        mean,
        std_dev: variance.sqrt(),
        runs: runs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(weighted_mean: f64) -> RunStatistic {
        RunStatistic {
            weighted_mean,
            weighted_std_dev: 0.0,
            total_intervals: 1,
            stable_intervals: 1,
            stable_duration_ms: 10_000,
        }
    }

    #[test]
    fn test_mean_and_population_stddev() {
        let stat = condition_statistic(&[run(900_000.0), run(920_000.0), run(880_000.0)]).unwrap();

        assert!((stat.mean - 900_000.0).abs() < 1e-6);
        assert!((stat.std_dev - 16_329.93).abs() < 0.01);
        assert_eq!(stat.runs, 3);
    }

    #[test]
    fn test_single_run_has_zero_spread() {
        let stat = condition_statistic(&[run(1_234_567.5)]).unwrap();
        assert_eq!(stat.mean, 1_234_567.5);
        assert_eq!(stat.std_dev, 0.0);
    }

    #[test]
    fn test_run_weights_are_ignored() {
        let mut long = run(600_000.0);
        long.stable_duration_ms = 600_000;
        let stat = condition_statistic(&[long, run(400_000.0)]).unwrap();
        assert_eq!(stat.mean, 500_000.0);
    }

    #[test]
    fn test_no_runs() {
        assert!(matches!(condition_statistic(&[]), Err(Error::NoRuns)));
    }

    #[test]
    fn test_display_repeats_stddev() {
        let stat = condition_statistic(&[run(900_000.0), run(920_000.0), run(880_000.0)]).unwrap();
        assert_eq!(stat.to_string(), "900000.00 16329.93 16329.93");
    }
}
