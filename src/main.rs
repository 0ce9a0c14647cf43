use analytics::{AnalyticsEngine, Forecaster, KpiSummarizer, MetricsDeriver};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use configuration::{Config, MAX_HORIZON};
use core_types::{ChurnMeanPolicy, DuplicateYearPolicy, RawRecord, UnitScale};
use datasets::DatasetCatalog;
use rust_decimal::Decimal;
use std::path::PathBuf;

mod render;
mod telemetry;

/// The main entry point for the Recurra metrics application.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = telemetry::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Models => handle_models(&config),
        Commands::Report(args) => handle_report(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Subscription revenue metrics (MRR, ARR, churn, ARPU, LTV) and ARR forecasts
/// from yearly customer records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the business models available in the dataset catalog.
    Models,
    /// Compute historical metrics, headline KPIs and an ARR forecast.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Catalog identifier of the business model (see `models`).
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    model: Option<String>,

    /// Read records from this CSV file instead of the catalog.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Annual ARR growth for the scenario, in percent (e.g. 5, -10, 12.5).
    #[arg(long, allow_hyphen_values = true)]
    growth_rate: Option<Decimal>,

    /// Number of years to forecast.
    #[arg(long)]
    horizon: Option<u32>,

    /// Unit for MRR and ARR figures.
    #[arg(long, value_enum)]
    unit_scale: Option<UnitScale>,

    /// How undefined churn years affect the period average.
    #[arg(long, value_enum)]
    churn_mean: Option<ChurnMeanPolicy>,

    /// Which record to keep when a year appears more than once.
    #[arg(long, value_enum)]
    duplicate_years: Option<DuplicateYearPolicy>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_models(config: &Config) -> anyhow::Result<()> {
    let catalog = DatasetCatalog::from_config(config);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "Business model", "File"]);
    for model in catalog.models() {
        table.add_row(vec![
            model.id.clone(),
            model.label.clone(),
            catalog.directory().join(&model.file).display().to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}

/// Loads the selected dataset, runs the engine and prints the report.
fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let horizon = args.horizon.unwrap_or(config.forecast.horizon);
    if horizon > MAX_HORIZON {
        bail!("--horizon must be at most {}, got {}", MAX_HORIZON, horizon);
    }
    let growth_rate_pct = args
        .growth_rate
        .unwrap_or(config.forecast.default_growth_rate_pct);

    let (title, records) = load_records(&args, config)?;

    let unit_scale = args.unit_scale.unwrap_or(config.analytics.unit_scale);
    let duplicate_years = args.duplicate_years.unwrap_or(config.analytics.duplicate_years);
    let churn_mean = args.churn_mean.unwrap_or(config.analytics.churn_mean_policy);
    tracing::info!(
        dataset = %title,
        %unit_scale,
        %duplicate_years,
        %churn_mean,
        %growth_rate_pct,
        horizon,
        "Running report."
    );

    let engine = AnalyticsEngine::new(
        MetricsDeriver::new(unit_scale, duplicate_years),
        KpiSummarizer::new(churn_mean),
        Forecaster::new(horizon),
    );
    let report = engine.run(&records, growth_rate_pct);

    match args.format {
        OutputFormat::Table => print!("{}", render::render_report(&title, &report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Resolves the record source. Missing or unknown datasets degrade to no
/// records so the report still renders its empty state.
fn load_records(args: &ReportArgs, config: &Config) -> anyhow::Result<(String, Vec<RawRecord>)> {
    if let Some(path) = &args.file {
        let records = datasets::read_csv_path(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Dataset file unavailable, continuing with no data.");
            Vec::new()
        });
        return Ok((path.display().to_string(), records));
    }

    let Some(id) = args.model.as_deref() else {
        bail!("either --model or --file is required");
    };

    let catalog = DatasetCatalog::from_config(config);
    let title = catalog
        .resolve(id)
        .map_or_else(|_| id.to_string(), |model| model.label.clone());
    Ok((title, catalog.load_or_empty(id)))
}
