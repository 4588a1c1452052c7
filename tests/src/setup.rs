//! Common test setup functions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clickhouse_client::{ClickHouseClient, ClickHouseConfig};
use pricing_core::{ObjectRef, Result};
use worker::{EnrichmentJob, FixedClock, JobConfig, JobReport};

use crate::containers::TestContainers;
use crate::fixtures::{run_time, BASELINE_BUCKET, BASELINE_KEY};
use crate::mocks::{MockObjectStore, MockSink};

/// Job wired to in-memory collaborators and a fixed clock.
///
/// The same [`EnrichmentJob`] the binary runs, with:
/// - `MockObjectStore` standing in for the bucket
/// - `MockSink` capturing what would be written
pub struct TestContext {
    pub store: MockObjectStore,
    pub sink: MockSink,
    pub config: JobConfig,
    pub now: DateTime<Utc>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(JobConfig::default())
    }

    pub fn with_config(config: JobConfig) -> Self {
        Self {
            store: MockObjectStore::new(),
            sink: MockSink::new(),
            config,
            now: run_time(),
        }
    }

    /// Build a job over this context's collaborators.
    pub fn job(&self) -> EnrichmentJob {
        EnrichmentJob::new(
            self.config.clone(),
            Arc::new(self.store.clone()),
            Arc::new(self.sink.clone()),
        )
        .with_clock(Arc::new(FixedClock(self.now)))
    }

    /// Store the historical snapshot at the default baseline location.
    pub fn put_baseline(&self, body: &str) -> ObjectRef {
        self.store
            .put(BASELINE_BUCKET, BASELINE_KEY, body.to_string(), self.now);
        ObjectRef::new(BASELINE_BUCKET, BASELINE_KEY)
    }

    /// Store an aggregate under the configured bucket.
    pub fn put_aggregate(&self, key: &str, body: &str, last_modified: DateTime<Utc>) {
        self.store.put(
            &self.config.aggregates_bucket,
            key,
            body.to_string(),
            last_modified,
        );
    }

    /// Run the job once for `baseline`.
    pub async fn run(&self, baseline: &ObjectRef) -> Result<JobReport> {
        self.job().run(baseline).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Real ClickHouse behind a testcontainer.
pub struct ClickHouseContext {
    pub containers: TestContainers,
    pub clickhouse: Arc<ClickHouseClient>,
}

impl ClickHouseContext {
    pub async fn new() -> Self {
        let containers = TestContainers::start().await;

        let config = ClickHouseConfig {
            url: containers.clickhouse_url.clone(),
            database: containers.clickhouse_database.clone(),
            username: containers.clickhouse_username.clone(),
            password: containers.clickhouse_password.clone(),
            ..ClickHouseConfig::default()
        };
        let clickhouse = Arc::new(ClickHouseClient::new(config));

        Self {
            containers,
            clickhouse,
        }
    }

    /// Get the ClickHouse URL.
    pub fn clickhouse_url(&self) -> &str {
        &self.containers.clickhouse_url
    }
}
