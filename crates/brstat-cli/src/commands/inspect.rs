use crate::OutputFormat;
use anyhow::{Context, Result};
use brstat_core::analysis::{Interval, RunStatistic, WeightedStatsAggregator};
use brstat_core::log::{LogSampleExtractor, SampleLog};
use std::path::Path;

/// Breakdown of a single log file
#[derive(Debug, Clone)]
pub struct Inspection {
    pub log: SampleLog,
    pub intervals: Vec<Interval>,
    pub threshold_ms: i64,
    /// Why no statistic could be computed, if it could not
    pub statistic: std::result::Result<RunStatistic, String>,
}

/// Extract and score one log file
///
/// Unreadable files, a missing trailer and backwards timestamps are errors.
/// A log without stable intervals still yields its breakdown.
pub fn inspect_log(file: &Path) -> Result<Inspection> {
    let log = LogSampleExtractor::new()
        .extract_file(file)
        .with_context(|| format!("Failed to extract samples from {}", file.display()))?;

    let aggregator = WeightedStatsAggregator::default();
    let intervals = aggregator.intervals(&log.samples, log.final_timestamp)?;

    let statistic = match aggregator.run_statistic(&log.samples, log.final_timestamp) {
        Ok(stat) => Ok(stat),
        Err(e) if e.is_no_data() => Err(e.to_string()),
        Err(e) => return Err(e.into()),
    };

    Ok(Inspection {
        log,
        intervals,
        threshold_ms: aggregator.threshold_ms(),
        statistic,
    })
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Inspecting log file: {}", file.display());

    let inspection = inspect_log(file)?;

    match format {
        OutputFormat::Line => output_line(&inspection)?,
        OutputFormat::Pretty => output_pretty(&inspection),
    }

    Ok(())
}

fn output_line(inspection: &Inspection) -> Result<()> {
    match &inspection.statistic {
        Ok(stat) => {
            println!("{:.2} {:.2}", stat.weighted_mean, stat.weighted_std_dev);
            Ok(())
        }
        Err(reason) => anyhow::bail!("{}", reason),
    }
}

fn output_pretty(inspection: &Inspection) {
    use console::style;

    println!("\n{}", style("Log Inspection").bold().cyan());
    println!("{}", style("==============").cyan());

    println!("\n{}", style("Samples:").bold());
    println!("  Bitrate Samples:  {}", inspection.log.samples.len());
    if let Some(first) = inspection.log.samples.first() {
        println!("  First Sample:     {}", first.timestamp);
    }
    println!("  Last Line:        {}", inspection.log.final_timestamp);

    if !inspection.intervals.is_empty() {
        println!(
            "\n{}",
            style(format!(
                "Intervals (stable when longer than {} ms):",
                inspection.threshold_ms
            ))
            .bold()
        );
        for interval in &inspection.intervals {
            let line = format!(
                "  {}  {:>8} ms  {:>10}",
                interval.start, interval.duration_ms, interval.value
            );
            if interval.duration_ms > inspection.threshold_ms {
                println!("{}", line);
            } else {
                println!("{}  {}", style(line).dim(), style("dropped").dim());
            }
        }
    }

    println!("\n{}", style("Weighted Bitrate:").bold());
    match &inspection.statistic {
        Ok(stat) => {
            println!("  Mean:             {:.2}", stat.weighted_mean);
            println!("  Std Dev:          {:.2}", stat.weighted_std_dev);
            println!(
                "  Stable Intervals: {} of {} ({} ms)",
                stat.stable_intervals, stat.total_intervals, stat.stable_duration_ms
            );
        }
        Err(reason) => println!("  {}", style(reason).yellow()),
    }

    println!(); // trailing newline
}
