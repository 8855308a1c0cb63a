//! Wind artifact pipeline service.
//!
//! Turns GFS grid files left on disk by the external downloader into
//! per-level JSON wind artifacts in a date-partitioned tree, then
//! refreshes the `current/` alias per level. Also prints the retrieval
//! request the external downloader consumes (`plan` subcommand).

mod pipeline;
mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wind_artifacts::{Grib2JsonConverter, LevelCatalog};

#[derive(Parser, Debug)]
#[command(name = "wind-pipeline")]
#[command(about = "Derives per-level wind JSON artifacts from GFS model runs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one pipeline pass over the downloaded grid tree
    Run(RunArgs),
    /// Print the retrieval request for the external downloader as JSON
    Plan(PlanArgs),
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    /// Directory the external downloader saves grid files into
    #[arg(long, env = "WIND_INPUT_DIR", default_value = "public/data/weather/gfs")]
    input_dir: PathBuf,

    /// Root of the dated artifact tree
    #[arg(long, env = "WIND_OUTPUT_ROOT", default_value = "public/data/weather")]
    output_root: PathBuf,

    /// YAML level catalog overriding the built-in GFS table
    #[arg(long, env = "WIND_LEVELS")]
    levels: Option<PathBuf>,

    /// Converter executable invoked once per (valid time, level) cell
    #[arg(long, env = "WIND_CONVERTER", default_value = "grib2json")]
    converter: String,

    /// Maximum concurrent converter invocations
    #[arg(long, default_value = "5")]
    max_concurrent: usize,
}

#[derive(ClapArgs, Debug)]
struct PlanArgs {
    /// Calendar day of the runs to request (default: today, UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Synoptic run hours to request
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "0,6,12,18",
        value_parser = clap::value_parser!(u32).range(0..24)
    )]
    cycles: Vec<u32>,

    /// Forecast offsets to request per run
    #[arg(long, value_delimiter = ',', default_value = "0,3")]
    offsets: Vec<u32>,

    /// YAML level catalog overriding the built-in GFS table
    #[arg(long, env = "WIND_LEVELS")]
    levels: Option<PathBuf>,

    /// Concurrency budget passed through to the downloader
    #[arg(long, default_value = "5")]
    max_threads: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the plan output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Plan(args) => print_plan(args),
    }
}

async fn run(args: RunArgs) -> Result<()> {
    info!("Starting wind artifact pipeline pass");

    let catalog = load_catalog(args.levels.as_deref())?;
    info!(levels = catalog.len(), "Loaded level catalog");

    let converter = Grib2JsonConverter::new(args.converter);
    let summary = pipeline::run_pass(
        &args.input_dir,
        &args.output_root,
        &catalog,
        converter,
        args.max_concurrent,
    )
    .await;

    info!(
        snapshots = summary.snapshots,
        valid_times = summary.groups,
        emitted = summary.artifacts_emitted,
        failed = summary.cells_failed,
        aliases = summary.aliases_published,
        "Pipeline pass complete"
    );

    Ok(())
}

fn print_plan(args: PlanArgs) -> Result<()> {
    let catalog = load_catalog(args.levels.as_deref())?;
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let request = plan::build_request(date, &args.cycles, &args.offsets, &catalog, args.max_threads);
    println!("{}", serde_json::to_string_pretty(&request)?);

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<LevelCatalog> {
    match path {
        Some(p) => LevelCatalog::load(p)
            .with_context(|| format!("Failed to load level catalog from {}", p.display())),
        None => Ok(LevelCatalog::default_gfs()),
    }
}
