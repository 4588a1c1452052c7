//! Metrics for a single enrichment run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Accumulated time spent in one stage of a run.
#[derive(Debug, Default)]
pub struct Latency {
    total_ms: AtomicU64,
    count: AtomicU64,
}

impl Latency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, elapsed: Duration) {
        self.total_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of observations.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms.load(Ordering::Relaxed)
    }
}

/// Metrics collected while one job runs.
#[derive(Debug, Default)]
pub struct JobMetrics {
    pub bytes_downloaded: Counter,
    pub baseline_entries: Counter,
    pub records_enriched: Counter,
    pub undefined_percents: Counter,
    pub records_persisted: Counter,

    pub download_latency: Latency,
    pub enrich_latency: Latency,
    pub persist_latency: Latency,
}

impl JobMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> JobMetricsSnapshot {
        JobMetricsSnapshot {
            timestamp: Utc::now(),
            bytes_downloaded: self.bytes_downloaded.get(),
            baseline_entries: self.baseline_entries.get(),
            records_enriched: self.records_enriched.get(),
            undefined_percents: self.undefined_percents.get(),
            records_persisted: self.records_persisted.get(),
            downloads: self.download_latency.count(),
            download_latency_ms: self.download_latency.total_ms(),
            enrich_latency_ms: self.enrich_latency.total_ms(),
            persist_latency_ms: self.persist_latency.total_ms(),
        }
    }
}

/// A snapshot of job metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub bytes_downloaded: u64,
    pub baseline_entries: u64,
    pub records_enriched: u64,
    pub undefined_percents: u64,
    pub records_persisted: u64,
    /// Objects fetched from the store.
    pub downloads: u64,
    pub download_latency_ms: u64,
    pub enrich_latency_ms: u64,
    pub persist_latency_ms: u64,
}
