//! ClickHouse table schemas.
//!
//! One row per (realm, auction house, item). Each tracked metric contributes
//! three columns: `<metric>_current`, `<metric>_average`, and a nullable
//! `<metric>_percent` that is NULL when the baseline average is zero.

use pricing_core::Metric;

/// SQL for creating the price averages table under `table`.
pub fn create_price_averages_table(table: &str) -> String {
    let metric_columns: Vec<String> = Metric::ALL
        .iter()
        .map(|m| {
            format!(
                "    {name}_current Int32,\n    {name}_average Int32,\n    {name}_percent Nullable(Float32)",
                name = m.name()
            )
        })
        .collect();

    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    realm_id Int32,
    auction_house_id Int32,
    item_id Int32,

{metrics},

    updated_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY (realm_id, auction_house_id, item_id)
"#,
        table = table,
        metrics = metric_columns.join(",\n")
    )
}

/// SQL for creating an empty table with the same structure as `source`.
pub fn create_staging_table(staging: &str, source: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {} AS {}", staging, source)
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", table)
}

/// DDL for the tables that must exist before any write, in execution order.
pub fn all_tables(table: &str) -> Vec<String> {
    vec![create_price_averages_table(table)]
}
