use anyhow::Result;
use brstat_cli::{OutputFormat, commands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brstat")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Duration-weighted bitrate statistics from logcat captures",
    long_about = "brstat reads the encoder bitrate changes logged during streaming test runs, \
                  weights each bitrate by how long it was in effect, and summarises repeated \
                  runs of every experiment condition."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (line, pretty)
    #[arg(long, global = true, value_enum, default_value = "line")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Report mean and standard deviation per condition of a sweep
    Report {
        /// Root folder of the experiment tree (<codec>/<bitrate>/<bitrate><res><fps>/<run>)
        #[arg(short, long, visible_alias = "folderpath", value_name = "DIR")]
        folder: PathBuf,

        /// JSON sweep definition (defaults to the built-in H264 15/30 fps sweep)
        #[arg(short, long, value_name = "FILE")]
        sweep: Option<PathBuf>,

        /// Only score run folders matching this name or glob
        #[arg(long, value_name = "PATTERN")]
        runs: Option<String>,
    },

    /// Show the samples and intervals of a single log file
    Inspect {
        /// Path to the logcat capture
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Report {
            folder,
            sweep,
            runs,
        } => commands::report::execute(&folder, sweep.as_deref(), runs.as_deref(), cli.format),
        Commands::Inspect { file } => commands::inspect::execute(&file, cli.format),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("brstat=debug,brstat_cli=debug,brstat_core=debug")
    } else {
        EnvFilter::new("brstat=info,brstat_cli=info,brstat_core=warn")
    };

    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
