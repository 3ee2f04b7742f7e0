//! catalog-import - enrich a supplier price list into the catalog
//!
//! Reads rows from a JSON file, runs one batch and prints the report as JSON.

#![allow(missing_docs)]

use catalog_enricher::core::traits::{CatalogStore, EnrichmentService};
use catalog_enricher::core::types::{CategoryTable, load_rows};
use catalog_enricher::services::{HttpEnrichmentClient, OfflineEnrichment};
use catalog_enricher::storage::{InMemoryCatalogStore, SeaOrmCatalogStore};
use catalog_enricher::utils::logging::{LogFormat, init_logging};
use catalog_enricher::{BatchReport, Config, Orchestrator, OrchestratorConfig, Result, RunOptions};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Enrich a supplier price list and import it into the catalog
#[derive(Debug, Parser)]
#[command(name = "catalog-import", version, long_version = LONG_VERSION, about)]
struct Cli {
    /// YAML configuration file; environment variables only when omitted
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of `{code, name, price}` rows
    #[arg(short, long)]
    rows: PathBuf,

    /// Upper bound on concurrent workers
    #[arg(long)]
    max_workers: Option<usize>,

    /// Process at most this many pending rows
    #[arg(long)]
    limit: Option<usize>,

    /// Keep results in memory instead of writing to the database
    #[arg(long)]
    dry_run: bool,

    /// Skip the enrichment service and use fallback values
    #[arg(long)]
    offline: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "CATALOG_LOG_JSON")]
    log_json: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(e) = init_logging(format, cli.log_level) {
        eprintln!("Warning: {}", e);
    }

    match run(cli).await {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: failed to serialize report: {}", e),
            }
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<BatchReport> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    let rows = load_rows(&cli.rows).await?;
    info!(rows = rows.len(), path = %cli.rows.display(), "Rows loaded");

    let enrichment: Arc<dyn EnrichmentService> = if cli.offline {
        info!("Offline mode: enrichment uses fallback values");
        Arc::new(OfflineEnrichment::new())
    } else {
        Arc::new(HttpEnrichmentClient::new(config.enrichment.clone())?)
    };

    let store: Arc<dyn CatalogStore> = if cli.dry_run {
        info!("Dry run: nothing is written to the database");
        Arc::new(InMemoryCatalogStore::new())
    } else {
        Arc::new(SeaOrmCatalogStore::connect(&config.storage).await?)
    };

    let orchestrator = Orchestrator::new(
        OrchestratorConfig::from_config(&config),
        config.credentials.clone(),
        enrichment,
        store,
        Arc::new(CategoryTable::new(config.categories.clone())),
    );

    let options = RunOptions {
        max_workers: cli.max_workers,
        limit: cli.limit,
    };
    Ok(orchestrator.run_with(&rows, options).await)
}
