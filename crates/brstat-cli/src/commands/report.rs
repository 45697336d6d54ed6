use crate::OutputFormat;
use anyhow::{Context, Result};
use brstat_core::analysis::WeightedStatsAggregator;
use brstat_core::layout::{FsRunDirectories, RunPattern};
use brstat_core::log::LogSampleExtractor;
use brstat_core::report::{ComparisonReport, Reporter, RunOutcome};
use brstat_core::sweep::Sweep;
use std::path::Path;

/// Evaluate a sweep over the experiment tree under `folder`
pub fn build_report(
    folder: &Path,
    sweep: Option<&Path>,
    runs: Option<&str>,
) -> Result<Vec<ComparisonReport>> {
    if !folder.is_dir() {
        anyhow::bail!("Experiment folder not found: {}", folder.display());
    }

    let sweep = match sweep {
        Some(path) => Sweep::from_file(path)
            .with_context(|| format!("Failed to load sweep {}", path.display()))?,
        None => Sweep::builtin(),
    };

    let mut source = FsRunDirectories::new();
    if let Some(pattern) = runs {
        source = source.with_pattern(RunPattern::parse(pattern)?);
    }

    let reporter = Reporter::new(
        source,
        LogSampleExtractor::new(),
        WeightedStatsAggregator::default(),
    );

    Ok(reporter.evaluate_sweep(folder, &sweep)?)
}

pub fn execute(
    folder: &Path,
    sweep: Option<&Path>,
    runs: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!(
        "Reporting bitrates under: {} ({} format)",
        folder.display(),
        format.as_str()
    );

    let reports = build_report(folder, sweep, runs)?;

    match format {
        OutputFormat::Line => output_line(&reports),
        OutputFormat::Pretty => output_pretty(&reports),
    }

    Ok(())
}

fn output_line(reports: &[ComparisonReport]) {
    for report in reports {
        // Each comparison is followed by an empty line
        println!("{}\n", report.to_line());
    }
}

fn output_pretty(reports: &[ComparisonReport]) {
    use console::style;

    println!("\n{}", style("Bitrate Report").bold().cyan());
    println!("{}", style("==============").cyan());

    for report in reports {
        println!(
            "\n{}",
            style(format!("Target bitrate {}:", report.bitrate)).bold()
        );

        if report.conditions.is_empty() {
            println!("  {}", style("no conditions with usable runs").dim());
            continue;
        }

        for condition in &report.conditions {
            let stat = &condition.statistic;
            println!(
                "  {:<22} mean {:>12.2}  stddev {:>11.2}  ({}/{} runs)",
                condition.condition.to_string(),
                stat.mean,
                stat.std_dev,
                stat.runs,
                condition.runs.len()
            );

            for run in &condition.runs {
                match run {
                    RunOutcome::Scored { run, statistic } => println!(
                        "    {:<20} {:>12.2} ± {:.2}  ({}/{} intervals)",
                        run.name,
                        statistic.weighted_mean,
                        statistic.weighted_std_dev,
                        statistic.stable_intervals,
                        statistic.total_intervals
                    ),
                    RunOutcome::Skipped { run, reason } => println!(
                        "    {:<20} {}",
                        run.name,
                        style(format!("skipped: {}", reason)).yellow()
                    ),
                }
            }
        }
    }

    println!(); // trailing newline
}
