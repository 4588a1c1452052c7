//! Query functions for reading data back (used in tests and admin).

use crate::client::ClickHouseClient;
use crate::insert::PriceAverageRow;
use pricing_core::{Error, Result};

/// Count rows in the live table.
pub async fn count_price_averages(client: &ClickHouseClient) -> Result<u64> {
    let sql = format!("SELECT count() FROM {}", client.config().table);
    let count: u64 = client
        .inner()
        .query(&sql)
        .fetch_one()
        .await
        .map_err(|e| Error::persist(format!("Query error: {}", e)))?;
    Ok(count)
}

/// Fetch all rows of the live table ordered by key.
pub async fn fetch_price_averages(client: &ClickHouseClient) -> Result<Vec<PriceAverageRow>> {
    let sql = format!(
        "SELECT ?fields FROM {} ORDER BY realm_id, auction_house_id, item_id",
        client.config().table
    );
    let rows: Vec<PriceAverageRow> = client
        .inner()
        .query(&sql)
        .fetch_all()
        .await
        .map_err(|e| Error::persist(format!("Query error: {}", e)))?;
    Ok(rows)
}
