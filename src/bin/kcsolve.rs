//! Command-line batch solver for knapsack-with-conflicts instance files.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use conflict_knapsack::batch::{discover, BatchConfig, BatchRunner, InstanceReport, DEFAULT_PATTERNS};
use conflict_knapsack::bnb::SolverConfig;
use conflict_knapsack::error::BatchError;
use conflict_knapsack::instance::ParseMode;
use log::{info, warn, LevelFilter};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Instance files to solve. When empty, files are discovered below `--root`.
    files: Vec<PathBuf>,

    /// Directory the discovery patterns are resolved against.
    #[arg(short = 'r', long, default_value = ".")]
    root: PathBuf,

    /// Glob pattern relative to `--root`; may be repeated. Defaults to the
    /// benchmark family layout.
    #[arg(short = 'p', long = "pattern")]
    patterns: Vec<String>,

    /// Time budget per instance, in seconds.
    #[arg(short = 't', long = "time-limit", default_value_t = 30.0)]
    time_limit: f64,

    /// Explore subtrees on all cores.
    #[arg(long)]
    parallel: bool,

    /// Branching depth used to split the tree between parallel workers.
    #[arg(long, default_value_t = 8)]
    split_depth: usize,

    /// Fail an instance on malformed data lines instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Re-check every returned selection against its instance.
    #[arg(long)]
    verify: bool,

    /// Print one JSON object per instance instead of the text report.
    #[arg(long)]
    json: bool,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("failed to configure logging: {0}")]
    Logging(#[from] log::SetLoggerError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize a report: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    configure_logging(args.verbose)?;

    let files = if args.files.is_empty() {
        if args.patterns.is_empty() {
            discover(&args.root, DEFAULT_PATTERNS)?
        } else {
            discover(&args.root, args.patterns.as_slice())?
        }
    } else {
        args.files.clone()
    };
    if files.is_empty() {
        warn!("no instance files found below {}", args.root.display());
    }
    info!("{} instance files to solve", files.len());

    let solver = SolverConfig::default()
        .with_time_limit_secs(args.time_limit)
        .with_parallel(args.parallel)
        .with_split_depth(args.split_depth);
    let config = BatchConfig::default()
        .with_solver(solver)
        .with_parse_mode(if args.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        })
        .with_verify(args.verify);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_error: Option<CliError> = None;

    let report = BatchRunner::run_with_callback(files.as_slice(), &config, |report| {
        if write_error.is_some() {
            return;
        }
        let written = if args.json {
            print_json(&mut out, report)
        } else {
            print_text(&mut out, report)
        };
        if let Err(e) = written {
            write_error = Some(e);
        }
    });
    if let Some(e) = write_error {
        return Err(e);
    }

    if !args.json {
        writeln!(out)?;
        writeln!(out, "{report}")?;
    }
    Ok(())
}

fn print_text(out: &mut impl Write, report: &InstanceReport) -> Result<(), CliError> {
    writeln!(out, "Solving instance: {}", report.path.display())?;
    match &report.result {
        Ok(outcome) => {
            writeln!(out, "Picked items: {:?}", outcome.picked)?;
            writeln!(out, "Total weight: {}", outcome.total_weight)?;
            writeln!(out, "Total value: {}", outcome.total_value)?;
            writeln!(out, "Status: {}", outcome.status)?;
            writeln!(out, "Time taken: {:.4} seconds", report.elapsed.as_secs_f64())?;
        }
        Err(e) => writeln!(out, "Error: {e}")?,
    }
    writeln!(out)?;
    Ok(())
}

fn print_json(out: &mut impl Write, report: &InstanceReport) -> Result<(), CliError> {
    let record = match &report.result {
        Ok(outcome) => serde_json::json!({
            "path": display(&report.path),
            "outcome": outcome,
        }),
        Err(e) => serde_json::json!({
            "path": display(&report.path),
            "error": e.to_string(),
        }),
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn configure_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "% {}: {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .try_init()?;
    info!("Logging successfully configured");
    Ok(())
}
