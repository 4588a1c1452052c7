//! Auction Price Enricher
//!
//! One invocation per object-created notification:
//! - Baseline built from the notified historical snapshot
//! - Latest hourly aggregate enriched against it
//! - Price averages replaced in ClickHouse
//!
//! The notification JSON is read from the file named by the first argument,
//! or from stdin when no argument (or `-`) is given.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use clickhouse_client::{ClickHouseClient, ClickHouseConfig};
use pricing_core::S3Event;
use s3_store::{S3Config, S3Store};
use telemetry::{init_tracing, TracingConfig};
use worker::{EnrichmentJob, JobConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    job: JobConfig,

    #[serde(default)]
    s3: S3Config,

    #[serde(default)]
    clickhouse: ClickHouseConfig,

    #[serde(default)]
    log: TracingConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.log).context("Failed to initialize tracing")?;

    info!("Starting price enricher v{}", env!("CARGO_PKG_VERSION"));

    let raw = read_event(std::env::args().nth(1)).await?;
    let event = S3Event::from_json(&raw).context("Failed to parse S3 event")?;
    if event.records.len() > 1 {
        warn!(
            records = event.records.len(),
            "Event carries more than one record; only the first is processed"
        );
    }
    let object = event
        .first_object()
        .context("Failed to decode S3 object key")?;

    let store = Arc::new(S3Store::new(&config.s3).await);
    let clickhouse = Arc::new(ClickHouseClient::new(config.clickhouse.clone()));

    let job = EnrichmentJob::new(config.job.clone(), store, clickhouse);
    let report = job
        .run(&object)
        .await
        .with_context(|| format!("Failed to enrich price averages for {}", object))?;

    info!(
        run_id = %report.run_id,
        baseline = %report.baseline,
        detail = %report.detail,
        records = report.records_persisted,
        "Run complete"
    );
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("PRICE_ENRICHER")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat overrides for the common deployment variables
    if let Ok(url) = std::env::var("DB_CONNECTION_STRING") {
        config.clickhouse.url = url;
    }
    if let Ok(url) = std::env::var("PRICE_ENRICHER_CLICKHOUSE_URL") {
        config.clickhouse.url = url;
    }
    if let Ok(database) = std::env::var("PRICE_ENRICHER_CLICKHOUSE_DATABASE") {
        config.clickhouse.database = database;
    }
    if let Ok(username) = std::env::var("PRICE_ENRICHER_CLICKHOUSE_USERNAME") {
        config.clickhouse.username = Some(username);
    }
    if let Ok(password) = std::env::var("PRICE_ENRICHER_CLICKHOUSE_PASSWORD") {
        config.clickhouse.password = Some(password);
    }
    if let Ok(region) = std::env::var("PRICE_ENRICHER_S3_REGION") {
        config.s3.region = Some(region);
    }
    if let Ok(endpoint) = std::env::var("PRICE_ENRICHER_S3_ENDPOINT_URL") {
        config.s3 = config.s3.with_endpoint(endpoint);
    }

    Ok(config)
}

/// Read the notification JSON from `path`, or stdin.
async fn read_event(path: Option<String>) -> Result<String> {
    match path.as_deref() {
        None | Some("-") => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read event from stdin")?;
            Ok(raw)
        }
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event file {}", path)),
    }
}
