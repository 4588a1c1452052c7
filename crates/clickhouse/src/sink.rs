//! Persistence seam for enriched records.

use async_trait::async_trait;
use pricing_core::{EnrichedRecord, Result};

use crate::client::ClickHouseClient;

/// Destination for one run's enriched records.
///
/// Implemented by [`ClickHouseClient`]; tests substitute an in-memory sink.
#[async_trait]
pub trait PriceAverageSink: Send + Sync {
    /// Fails with a connection error when the backend is unreachable.
    async fn check(&self) -> Result<()>;

    /// Replaces all previously stored records with `records`.
    async fn replace_all(&self, records: &[EnrichedRecord]) -> Result<usize>;
}

#[async_trait]
impl PriceAverageSink for ClickHouseClient {
    async fn check(&self) -> Result<()> {
        crate::health::check_connection(self).await
    }

    async fn replace_all(&self, records: &[EnrichedRecord]) -> Result<usize> {
        crate::insert::replace_price_averages(self, records).await
    }
}
