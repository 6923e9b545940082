//! rentabilidad CLI - Construction cost-curve reports
//!
//! Loads a schedule workbook (and optionally a physical-progress report),
//! builds the weekly cost, income and progress curves, and renders them.

mod config;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rentabilidad_core::{ProgressEntry, Renderer};
use rentabilidad_ingest::{load_progress, load_schedule};
use rentabilidad_render::{text::preview_tasks, JsonRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;

#[derive(Parser)]
#[command(name = "rentabilidad")]
#[command(author, version, about = "Construction cost vs income vs progress curves", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: ./rentabilidad.toml when present)
    #[arg(long, value_name = "FILE", global = true, env = "RENTABILIDAD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the cost report and render it
    Report {
        /// Schedule workbook
        #[arg(value_name = "SCHEDULE")]
        schedule: PathBuf,

        /// Physical-progress workbook
        #[arg(short, long, value_name = "FILE")]
        progress: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Output file (stdout if not specified; required for xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the first schedule rows with their cost per day
    Preview {
        /// Schedule workbook
        #[arg(value_name = "SCHEDULE")]
        schedule: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Xlsx,
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error al procesar el archivo: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise the `-v` count picks the level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let config = Config::discover(cli.config.as_deref(), &cwd)?;

    match &cli.command {
        Commands::Report {
            schedule,
            progress,
            format,
            output,
        } => cmd_report(
            &config,
            schedule,
            progress.as_deref(),
            *format,
            output.as_deref(),
            cli.quiet,
        ),
        Commands::Preview { schedule, rows } => cmd_preview(&config, schedule, *rows, cli.quiet),
    }
}

fn cmd_report(
    config: &Config,
    schedule: &Path,
    progress: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    if format == OutputFormat::Xlsx && output.is_none() {
        bail!("--format xlsx requires --output");
    }

    let tasks = load_schedule(schedule, &config.schedule_layout())
        .with_context(|| format!("{}", schedule.display()))?;

    let entries: Option<Vec<ProgressEntry>> = progress
        .map(|path| {
            load_progress(path, &config.progress_layout())
                .with_context(|| format!("{}", path.display()))
        })
        .transpose()?;

    let report = config.curve_builder().build(&tasks, entries.as_deref())?;

    let bytes = match format {
        OutputFormat::Svg => config.chart_renderer().render(&report)?.into_bytes(),
        OutputFormat::Xlsx => config.excel_renderer().render(&report)?,
        OutputFormat::Text => config.text_renderer().render(&report)?.into_bytes(),
        OutputFormat::Json => JsonRenderer.render(&report)?.into_bytes(),
    };
    debug!(format = ?format, bytes = bytes.len(), "report rendered");

    if !quiet {
        eprintln!("Cronograma cargado correctamente.");
        if entries.is_some() {
            eprintln!("Avance físico cargado correctamente.");
        }
    }

    write_output(output, &bytes)
}

fn cmd_preview(config: &Config, schedule: &Path, rows: usize, quiet: bool) -> Result<()> {
    let tasks = load_schedule(schedule, &config.schedule_layout())
        .with_context(|| format!("{}", schedule.display()))?;

    if !quiet {
        eprintln!("Cronograma cargado correctamente.");
    }
    print!("{}", preview_tasks(&tasks, rows));
    Ok(())
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
