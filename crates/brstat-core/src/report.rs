use crate::analysis::{Analyzer, ConditionStatistic, RunStatistic, WeightedStatsAggregator};
use crate::layout::{Condition, FsRunDirectories, RunDirectory, RunDirectorySource};
use crate::log::LogSampleExtractor;
use crate::sweep::{Comparison, Sweep};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// What became of one run folder
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Scored {
        run: RunDirectory,
        statistic: RunStatistic,
    },
    Skipped {
        run: RunDirectory,
        reason: String,
    },
}

impl RunOutcome {
    pub fn run(&self) -> &RunDirectory {
        match self {
            RunOutcome::Scored { run, .. } | RunOutcome::Skipped { run, .. } => run,
        }
    }

    pub fn statistic(&self) -> Option<&RunStatistic> {
        match self {
            RunOutcome::Scored { statistic, .. } => Some(statistic),
            RunOutcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConditionReport {
    pub condition: Condition,
    pub folder: PathBuf,
    pub runs: Vec<RunOutcome>,
    pub statistic: ConditionStatistic,
}

#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub bitrate: u32,
    /// Conditions that had at least one scored run, in sweep order
    pub conditions: Vec<ConditionReport>,
}

impl ComparisonReport {
    /// One `mean stddev stddev` group per reported condition, each followed
    /// by two spaces
    pub fn to_line(&self) -> String {
        self.conditions
            .iter()
            .map(|c| format!("{}  ", c.statistic))
            .collect()
    }
}

/// Scores every run of the conditions in a sweep
pub struct Reporter<S = FsRunDirectories> {
    source: S,
    extractor: LogSampleExtractor,
    aggregator: WeightedStatsAggregator,
}

impl Default for Reporter<FsRunDirectories> {
    fn default() -> Self {
        Self::new(
            FsRunDirectories::new(),
            LogSampleExtractor::new(),
            WeightedStatsAggregator::default(),
        )
    }
}

impl<S: RunDirectorySource> Reporter<S> {
    pub fn new(source: S, extractor: LogSampleExtractor, aggregator: WeightedStatsAggregator) -> Self {
        Self {
            source,
            extractor,
            aggregator,
        }
    }

    /// Weighted statistic of one run's log
    pub fn score_run(&self, run: &RunDirectory) -> Result<RunStatistic> {
        let log = self.extractor.extract_file(&run.log_file())?;
        self.aggregator.analyze(&log)
    }

    /// Score all runs of `condition` at `bitrate`
    ///
    /// Returns `None` when the condition folder is missing or none of its
    /// runs could be scored. Runs that fail are logged and kept as skipped.
    pub fn evaluate_condition(
        &self,
        root: &Path,
        bitrate: u32,
        condition: &Condition,
    ) -> Result<Option<ConditionReport>> {
        let folder = condition.folder(root, bitrate);
        tracing::debug!("Evaluating {} at {}: {}", condition, bitrate, folder.display());

        let run_dirs = match self.source.list_run_directories(&folder) {
            Ok(runs) => runs,
            Err(Error::MissingDirectory(path)) => {
                tracing::warn!("Skipping {} at {}: {} not found", condition, bitrate, path.display());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let runs: Vec<RunOutcome> = run_dirs
            .into_iter()
            .map(|run| match self.score_run(&run) {
                Ok(statistic) => RunOutcome::Scored { run, statistic },
                Err(e) => {
                    tracing::warn!("Skipping run {}: {}", run.log_file().display(), e);
                    RunOutcome::Skipped {
                        run,
                        reason: e.to_string(),
                    }
                }
            })
            .collect();

        let scored: Vec<RunStatistic> = runs.iter().filter_map(|r| r.statistic().copied()).collect();

        if scored.is_empty() {
            tracing::warn!(
                "Skipping {} at {}: no usable runs in {}",
                condition,
                bitrate,
                folder.display()
            );
            return Ok(None);
        }

        let statistic = self.aggregator.condition_statistic(&scored)?;

        tracing::info!(
            "{} at {}: {} of {} runs, mean={:.2}",
            condition,
            bitrate,
            scored.len(),
            runs.len(),
            statistic.mean
        );

        Ok(Some(ConditionReport {
            condition: condition.clone(),
            folder,
            runs,
            statistic,
        }))
    }

    pub fn evaluate_comparison(&self, root: &Path, comparison: &Comparison) -> Result<ComparisonReport> {
        let mut conditions = Vec::new();
        for condition in &comparison.conditions {
            if let Some(report) = self.evaluate_condition(root, comparison.bitrate, condition)? {
                conditions.push(report);
            }
        }

        Ok(ComparisonReport {
            bitrate: comparison.bitrate,
            conditions,
        })
    }

    pub fn evaluate_sweep(&self, root: &Path, sweep: &Sweep) -> Result<Vec<ComparisonReport>> {
        tracing::debug!("Evaluating sweep under: {}", root.display());

        sweep
            .comparisons
            .iter()
            .map(|comparison| self.evaluate_comparison(root, comparison))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn reporter() -> Reporter {
        Reporter::default()
    }

    /// Log with a single stable bitrate lasting ten seconds
    fn steady_log(value: i64) -> String {
        format!(
            "01-01 12:00:00.000  100  200 I ExtendedACodec:   int32_t bitrate = {}\n\
             01-01 12:00:10.000  100  200 I ActivityManager: done\n",
            value
        )
    }

    fn write_run(root: &Path, condition: &Condition, bitrate: u32, run: &str, log: &str) {
        let dir = condition.folder(root, bitrate).join(run);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("logcat.txt"), log).unwrap();
    }

    #[test]
    fn test_evaluate_condition() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("H264", "_small_", 30);
        write_run(root.path(), &condition, 900, "1", &steady_log(900_000));
        write_run(root.path(), &condition, 900, "2", &steady_log(920_000));
        write_run(root.path(), &condition, 900, "3", &steady_log(880_000));

        let report = reporter()
            .evaluate_condition(root.path(), 900, &condition)
            .unwrap()
            .unwrap();

        assert_eq!(report.runs.len(), 3);
        assert_eq!(report.statistic.runs, 3);
        assert!((report.statistic.mean - 900_000.0).abs() < 1e-6);
        assert!((report.statistic.std_dev - 16_329.93).abs() < 0.01);
    }

    #[test]
    fn test_failed_runs_are_skipped() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("H264", "_large_", 15);
        write_run(root.path(), &condition, 600, "1", &steady_log(600_000));
        write_run(root.path(), &condition, 600, "2", "no header here\n");
        fs::create_dir_all(condition.folder(root.path(), 600).join("3")).unwrap();

        let report = reporter()
            .evaluate_condition(root.path(), 600, &condition)
            .unwrap()
            .unwrap();

        assert_eq!(report.runs.len(), 3);
        assert_eq!(report.statistic.runs, 1);
        assert_eq!(report.statistic.mean, 600_000.0);
        assert!(matches!(report.runs[1], RunOutcome::Skipped { .. }));
        assert_eq!(report.runs[2].run().name, "3");
    }

    #[test]
    fn test_overflowing_timestamp_skips_only_that_run() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("H264", "_small_", 15);
        write_run(
            root.path(),
            &condition,
            1300,
            "1",
            "01-01 00:00:01.000  10  11 I ExtendedACodec:   int32_t bitrate = 500000\n\
             01-01 9999999999999:00:00.000  10  11 I Other: done\n",
        );
        write_run(root.path(), &condition, 1300, "2", &steady_log(1_300_000));

        let report = reporter()
            .evaluate_condition(root.path(), 1300, &condition)
            .unwrap()
            .unwrap();

        assert!(matches!(report.runs[0], RunOutcome::Skipped { .. }));
        assert_eq!(report.statistic.runs, 1);
        assert_eq!(report.statistic.mean, 1_300_000.0);
    }

    #[test]
    fn test_missing_condition_is_omitted() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("VP8", "_auto_", 30);

        let report = reporter()
            .evaluate_condition(root.path(), 1800, &condition)
            .unwrap();

        assert!(report.is_none());
    }

    #[test]
    fn test_condition_without_usable_runs_is_omitted() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("H264", "_small_", 15);
        let short = "01-01 12:00:00.000  100  200 I ExtendedACodec:   int32_t bitrate = 5\n\
                     01-01 12:00:01.000  100  200 I ActivityManager: done\n";
        write_run(root.path(), &condition, 600, "1", short);

        let report = reporter()
            .evaluate_condition(root.path(), 600, &condition)
            .unwrap();

        assert!(report.is_none());
    }

    #[test]
    fn test_comparison_line() {
        let root = TempDir::new().unwrap();
        let small = Condition::new("H264", "_small_", 15);
        let large = Condition::new("H264", "_large_", 15);
        let missing = Condition::new("H264", "_auto_", 30);
        write_run(root.path(), &small, 600, "1", &steady_log(550_000));
        write_run(root.path(), &large, 600, "1", &steady_log(590_000));
        write_run(root.path(), &large, 600, "2", &steady_log(610_000));

        let comparison = Comparison {
            bitrate: 600,
            conditions: vec![small, missing, large],
        };
        let report = reporter()
            .evaluate_comparison(root.path(), &comparison)
            .unwrap();

        assert_eq!(report.conditions.len(), 2);
        assert_eq!(
            report.to_line(),
            "550000.00 0.00 0.00  600000.00 10000.00 10000.00  "
        );
    }

    #[test]
    fn test_evaluate_sweep_keeps_order() {
        let root = TempDir::new().unwrap();
        let condition = Condition::new("H264", "_small_", 30);
        write_run(root.path(), &condition, 900, "1", &steady_log(870_000));

        let sweep = Sweep {
            comparisons: vec![
                Comparison {
                    bitrate: 600,
                    conditions: vec![condition.clone()],
                },
                Comparison {
                    bitrate: 900,
                    conditions: vec![condition],
                },
            ],
        };
        let reports = reporter().evaluate_sweep(root.path(), &sweep).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].bitrate, 600);
        assert!(reports[0].conditions.is_empty());
        assert_eq!(reports[0].to_line(), "");
        assert_eq!(reports[1].to_line(), "870000.00 0.00 0.00  ");
    }
}
