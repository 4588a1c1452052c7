//! Replace-all writes of enriched price averages.

use crate::client::ClickHouseClient;
use crate::schema::{create_staging_table, drop_table};
use clickhouse::Row;
use pricing_core::{EnrichedRecord, Error, Metric, MetricComparison, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Flattened enriched record for ClickHouse insertion.
///
/// An undefined percent is written as NULL.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct PriceAverageRow {
    pub realm_id: i32,
    pub auction_house_id: i32,
    pub item_id: i32,

    pub quantity_current: i32,
    pub quantity_average: i32,
    pub quantity_percent: Option<f32>,

    pub p05_current: i32,
    pub p05_average: i32,
    pub p05_percent: Option<f32>,

    pub p10_current: i32,
    pub p10_average: i32,
    pub p10_percent: Option<f32>,

    pub p25_current: i32,
    pub p25_average: i32,
    pub p25_percent: Option<f32>,

    pub p50_current: i32,
    pub p50_average: i32,
    pub p50_percent: Option<f32>,

    pub p75_current: i32,
    pub p75_average: i32,
    pub p75_percent: Option<f32>,

    pub p90_current: i32,
    pub p90_average: i32,
    pub p90_percent: Option<f32>,
}

fn percent_column(cmp: &MetricComparison) -> Option<f32> {
    cmp.percent.value().map(|v| v as f32)
}

impl From<&EnrichedRecord> for PriceAverageRow {
    fn from(record: &EnrichedRecord) -> Self {
        let m = &record.metrics;
        Self {
            realm_id: record.key.realm_id,
            auction_house_id: record.key.auction_house_id,
            item_id: record.key.item_id,

            quantity_current: m[Metric::Quantity].current,
            quantity_average: m[Metric::Quantity].average,
            quantity_percent: percent_column(&m[Metric::Quantity]),

            p05_current: m[Metric::P05].current,
            p05_average: m[Metric::P05].average,
            p05_percent: percent_column(&m[Metric::P05]),

            p10_current: m[Metric::P10].current,
            p10_average: m[Metric::P10].average,
            p10_percent: percent_column(&m[Metric::P10]),

            p25_current: m[Metric::P25].current,
            p25_average: m[Metric::P25].average,
            p25_percent: percent_column(&m[Metric::P25]),

            p50_current: m[Metric::P50].current,
            p50_average: m[Metric::P50].average,
            p50_percent: percent_column(&m[Metric::P50]),

            p75_current: m[Metric::P75].current,
            p75_average: m[Metric::P75].average,
            p75_percent: percent_column(&m[Metric::P75]),

            p90_current: m[Metric::P90].current,
            p90_average: m[Metric::P90].average,
            p90_percent: percent_column(&m[Metric::P90]),
        }
    }
}

/// Replaces the contents of the live table with `records`.
///
/// Rows go into a staging table private to this call; the staging and live
/// tables are then swapped with `EXCHANGE TABLES`, so readers see either the
/// previous contents or these. The staging table, which then holds the
/// previous rows, is dropped afterwards, also when staging fails.
///
/// Overlapping calls never share a staging table: the table ends up holding
/// the complete set of whichever call exchanged last.
pub async fn replace_price_averages(
    client: &ClickHouseClient,
    records: &[EnrichedRecord],
) -> Result<usize> {
    let table = client.config().table.clone();
    let staging = client
        .config()
        .staging_table(&Uuid::new_v4().simple().to_string());
    let start = std::time::Instant::now();

    crate::health::init_schema(client).await?;
    execute(client, &create_staging_table(&staging, &table)).await?;

    let result = stage_and_exchange(client, &staging, &table, records).await;

    if let Err(e) = execute(client, &drop_table(&staging)).await {
        warn!(staging = %staging, error = %e, "Failed to drop staging table");
    }
    result?;

    info!(
        table = %table,
        count = records.len(),
        latency_ms = %start.elapsed().as_millis(),
        "Replaced price averages"
    );

    Ok(records.len())
}

async fn stage_and_exchange(
    client: &ClickHouseClient,
    staging: &str,
    table: &str,
    records: &[EnrichedRecord],
) -> Result<()> {
    let mut insert = client
        .inner()
        .insert::<PriceAverageRow>(staging)
        .map_err(|e| Error::persist(format!("Insert error: {}", e)))?;

    for record in records {
        insert
            .write(&PriceAverageRow::from(record))
            .await
            .map_err(|e| Error::persist(format!("Write error: {}", e)))?;
    }

    insert
        .end()
        .await
        .map_err(|e| Error::persist(format!("End error: {}", e)))?;

    debug!(staging = %staging, count = records.len(), "Staged price averages");

    execute(
        client,
        &format!("EXCHANGE TABLES {} AND {}", staging, table),
    )
    .await
}

async fn execute(client: &ClickHouseClient, sql: &str) -> Result<()> {
    client
        .inner()
        .query(sql)
        .execute()
        .await
        .map_err(|e| Error::persist(format!("Failed to execute {:?}: {}", sql.trim(), e)))
}
