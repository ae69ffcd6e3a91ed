use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod accumulator;
mod batch;
mod error;
mod export;
mod geodesy;
mod gpx_reader;
mod splits;
mod summary;
mod timestamp;
mod track;

use accumulator::{AnalysisConfig, TimestampPolicy, TrackAccumulator};
use splits::DEFAULT_SPLIT_DISTANCE_M;

#[derive(Parser, Debug)]
#[command(author, version, about = "GPS track statistics and kilometer splits", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print overall statistics and the split table for one GPX file
    Analyze(AnalyzeArgs),
    /// Summarise every GPX file under a folder into a CSV
    Batch(BatchArgs),
}

#[derive(clap::Args, Debug)]
struct SplitOptions {
    /// Split length in meters
    #[arg(long, default_value_t = DEFAULT_SPLIT_DISTANCE_M)]
    split_distance: f64,

    /// How to treat timestamps that go backwards
    #[arg(long, value_enum, default_value_t = TimestampMode::Reject)]
    timestamps: TimestampMode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TimestampMode {
    Reject,
    Allow,
}

impl SplitOptions {
    fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            split_distance_m: self.split_distance,
            timestamp_policy: match self.timestamps {
                TimestampMode::Reject => TimestampPolicy::Reject,
                TimestampMode::Allow => TimestampPolicy::Allow,
            },
        }
    }
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// GPX file to analyse
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Also write the split table as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    splits_csv: Option<PathBuf>,

    #[command(flatten)]
    options: SplitOptions,
}

#[derive(clap::Args, Debug)]
struct BatchArgs {
    /// Folder searched recursively for .gpx files
    #[arg(value_hint = ValueHint::DirPath)]
    folder: PathBuf,

    /// Summary CSV path
    #[arg(short, long, default_value = "track_summary.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    #[command(flatten)]
    options: SplitOptions,
}

fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let accumulator = TrackAccumulator::new(args.options.to_config())?;
    let points = gpx_reader::read_track_points(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let analysis = accumulator
        .analyze(points)
        .with_context(|| format!("analysing {}", args.input.display()))?;

    print!("{}", summary::render_report(&analysis));

    if let Some(path) = args.splits_csv {
        export::write_splits_csv(&analysis.splits, &path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    let rows = batch::analyze_folder(&args.folder, args.options.to_config())?;
    batch::write_batch_csv(&rows, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), rows = rows.len(), "summary CSV written");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Batch(args) => handle_batch(args),
    }
}
