//! Enrichment job: baseline → enrich → replace.
//!
//! The job implements the whole pipeline for one triggering object:
//! 1. Verify the sink is reachable
//! 2. Download the baseline snapshot and build the lookup table
//! 3. Download the newest aggregate in the current hourly partition
//! 4. Enrich it and replace the stored records
//!
//! Every failure aborts the run; nothing is persisted unless all rows enrich.

use std::sync::Arc;
use std::time::Instant;

use clickhouse_client::PriceAverageSink;
use pricing_core::partition::hourly_partition;
use pricing_core::{BaselineAggregator, Enricher, NumericParsing, ObjectRef, Result};
use s3_store::{download_latest, ObjectStore};
use serde::{Deserialize, Serialize};
use telemetry::{JobMetrics, JobMetricsSnapshot};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};

/// Enrichment job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Bucket holding the hourly aggregates
    #[serde(default = "default_aggregates_bucket")]
    pub aggregates_bucket: String,
    /// Prefix under which hourly partitions are written
    #[serde(default = "default_aggregates_prefix")]
    pub aggregates_prefix: String,
    /// Only keys with this suffix are considered
    #[serde(default = "default_candidate_suffix")]
    pub candidate_suffix: String,
    /// Fail on unparsable numbers instead of reading them as zero
    #[serde(default = "default_strict_numeric_parsing")]
    pub strict_numeric_parsing: bool,
}

fn default_aggregates_bucket() -> String {
    "sod-auctions".to_string()
}

fn default_aggregates_prefix() -> String {
    "results/aggregates".to_string()
}

fn default_candidate_suffix() -> String {
    ".csv".to_string()
}

fn default_strict_numeric_parsing() -> bool {
    true
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            aggregates_bucket: default_aggregates_bucket(),
            aggregates_prefix: default_aggregates_prefix(),
            candidate_suffix: default_candidate_suffix(),
            strict_numeric_parsing: default_strict_numeric_parsing(),
        }
    }
}

impl JobConfig {
    pub fn numeric_parsing(&self) -> NumericParsing {
        NumericParsing::from_strict(self.strict_numeric_parsing)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub run_id: Uuid,
    pub baseline: ObjectRef,
    pub detail: ObjectRef,
    pub records_persisted: usize,
    pub metrics: JobMetricsSnapshot,
}

/// Runs the enrichment pipeline against injected collaborators.
pub struct EnrichmentJob {
    config: JobConfig,
    store: Arc<dyn ObjectStore>,
    sink: Arc<dyn PriceAverageSink>,
    clock: Arc<dyn Clock>,
}

impl EnrichmentJob {
    /// Creates a job that reads the wall clock.
    pub fn new(
        config: JobConfig,
        store: Arc<dyn ObjectStore>,
        sink: Arc<dyn PriceAverageSink>,
    ) -> Self {
        Self {
            config,
            store,
            sink,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs the job for the baseline snapshot at `baseline`.
    pub async fn run(&self, baseline: &ObjectRef) -> Result<JobReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("enrichment_job", %run_id, baseline = %baseline);

        let result = self.execute(run_id, baseline).instrument(span).await;
        if let Err(ref e) = result {
            error!(%run_id, code = e.code(), error = %e, "Enrichment job failed");
        }
        result
    }

    async fn execute(&self, run_id: Uuid, baseline_ref: &ObjectRef) -> Result<JobReport> {
        let metrics = JobMetrics::new();
        let parsing = self.config.numeric_parsing();

        self.sink.check().await?;

        info!("Downloading baseline file");
        let start = Instant::now();
        let body = self
            .store
            .get_object(&baseline_ref.bucket, &baseline_ref.key)
            .await?;
        metrics.download_latency.observe(start.elapsed());
        metrics.bytes_downloaded.inc_by(body.len() as u64);

        let baseline = BaselineAggregator::new(parsing).build(&body[..])?;
        drop(body);
        metrics.baseline_entries.inc_by(baseline.len() as u64);
        debug!(entries = baseline.len(), "Built baseline table");

        let prefix = hourly_partition(&self.config.aggregates_prefix, self.clock.now());
        info!(
            bucket = %self.config.aggregates_bucket,
            prefix = %prefix,
            "Downloading latest aggregate"
        );
        let start = Instant::now();
        let (detail_ref, body) = download_latest(
            self.store.as_ref(),
            &self.config.aggregates_bucket,
            &prefix,
            &self.config.candidate_suffix,
        )
        .await?;
        metrics.download_latency.observe(start.elapsed());
        metrics.bytes_downloaded.inc_by(body.len() as u64);

        let start = Instant::now();
        let records = Enricher::new(&baseline, parsing).enrich(&body[..])?;
        drop(body);
        metrics.enrich_latency.observe(start.elapsed());
        metrics.records_enriched.inc_by(records.len() as u64);
        metrics
            .undefined_percents
            .inc_by(records.iter().map(|r| r.undefined_percents() as u64).sum());

        let start = Instant::now();
        let persisted = self.sink.replace_all(&records).await?;
        metrics.persist_latency.observe(start.elapsed());
        metrics.records_persisted.inc_by(persisted as u64);

        let snapshot = metrics.snapshot();
        info!(
            detail = %detail_ref,
            baseline_entries = snapshot.baseline_entries,
            records = snapshot.records_enriched,
            undefined_percents = snapshot.undefined_percents,
            bytes = snapshot.bytes_downloaded,
            downloads = snapshot.downloads,
            download_ms = snapshot.download_latency_ms,
            enrich_ms = snapshot.enrich_latency_ms,
            persist_ms = snapshot.persist_latency_ms,
            "Enrichment complete"
        );

        Ok(JobReport {
            run_id,
            baseline: baseline_ref.clone(),
            detail: detail_ref,
            records_persisted: persisted,
            metrics: snapshot,
        })
    }
}
