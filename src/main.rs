//! Cardradar - smartcard benchmark radar comparisons
//!
//! Command line front end: generate, check, convert and summarize compare files.

use anyhow::{Context, Result};
use cardradar::charts::{CompareScript, JsonRenderer, Viewport};
use cardradar::compare::{Comparator, OutputFormat};
use cardradar::data::{Report, TimingLoader};
use cardradar::settings::Settings;
use cardradar::{logging, stats};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "cardradar")]
#[command(about = "Smartcard benchmark radar comparison datasets", long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate compare files for every ordered pair of devices
    Compare {
        /// Timing table with device, function, operation_avg_ms columns
        #[arg(long)]
        timings: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        #[arg(long, value_enum, default_value = "script")]
        format: FormatArg,
    },
    /// Parse and validate compare files
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the resolved draw call of a compare file as JSON
    Convert {
        file: PathBuf,

        /// Chart element width in pixels
        #[arg(long, default_value = "1280")]
        width: f64,

        /// Window inner height in pixels
        #[arg(long, default_value = "900")]
        height: f64,
    },
    /// Print per-product scores of a compare file
    Summary { file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// JavaScript data file
    Script,
    /// JSON document
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Script => OutputFormat::Script,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Compare {
            timings,
            out,
            format,
        } => {
            let profiles = TimingLoader::load_csv(&timings)
                .with_context(|| format!("loading timings from {}", timings.display()))?;
            let comparator = Comparator::new(&profiles, &settings)?;
            let written = comparator.write_all(&out, format.into())?;
            println!("{} compare files written to {}", written.len(), out.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { files } => check(&files, &settings),
        Command::Convert {
            file,
            width,
            height,
        } => {
            let script = load(&file, &settings)?;
            let stdout = std::io::stdout();
            let renderer = JsonRenderer::new(stdout.lock()).pretty(true);
            script.render(&Viewport::new(width, height), renderer)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Summary { file } => {
            let script = load(&file, &settings)?;
            let summary = stats::summarize(&script.data);
            let (a, b) = script
                .products
                .clone()
                .unwrap_or_else(|| ("first".to_string(), "second".to_string()));
            println!("{} axes shared by both products", summary.shared);
            for (name, s) in [a, b].iter().zip(summary.series.iter()) {
                println!(
                    "{name}: {}/{} supported, mean {:.3}, median {:.3}, faster on {}",
                    s.supported, s.axes, s.mean, s.median, s.wins
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read a compare file and apply the sentinel policy.
fn load(file: &Path, settings: &Settings) -> Result<CompareScript> {
    let mut script = CompareScript::read(file)?;
    let changed = settings.sentinel.apply(&mut script.data);
    if changed > 0 {
        info!(file = %file.display(), changed, "normalized NS sentinels");
    }
    Ok(script)
}

fn check(files: &[PathBuf], settings: &Settings) -> Result<ExitCode> {
    let rules = settings.validation_rules();
    let results: Vec<(PathBuf, Result<Report>)> = files
        .par_iter()
        .map(|file| {
            let report = load(file, settings).map(|script| script.validate(&rules));
            (file.clone(), report)
        })
        .collect();

    let mut failed = 0usize;
    for (file, result) in results {
        match result {
            Ok(report) if report.is_clean() => {
                info!(file = %file.display(), "compare file is clean");
                println!("{}: ok", file.display());
            }
            Ok(report) => {
                if report.has_errors() {
                    failed += 1;
                }
                println!(
                    "{}: {} error(s), {} warning(s)",
                    file.display(),
                    report.errors(),
                    report.warnings()
                );
                report.log(&file.display().to_string());
            }
            Err(e) => {
                failed += 1;
                println!("{}: unreadable: {e:#}", file.display());
            }
        }
    }

    if failed > 0 {
        warn!(failed, total = files.len(), "compare files with errors");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
