//! ClickHouse health checks.

use crate::client::ClickHouseClient;
use pricing_core::{Error, Result};
use tracing::{debug, error};

/// Check ClickHouse connection health.
pub async fn check_connection(client: &ClickHouseClient) -> Result<()> {
    let ping = client.inner().query("SELECT 1").fetch_one::<u8>();

    match tokio::time::timeout(client.timeout(), ping).await {
        Ok(Ok(_)) => {
            debug!("ClickHouse connection healthy");
            Ok(())
        }
        Ok(Err(e)) => {
            error!("ClickHouse health check failed: {}", e);
            Err(Error::connection(format!(
                "{} unreachable: {}",
                client.config().url,
                e
            )))
        }
        Err(_) => {
            error!("ClickHouse health check timed out");
            Err(Error::connection(format!(
                "{} did not answer within {}s",
                client.config().url,
                client.config().timeout_secs
            )))
        }
    }
}

/// Initialize database schema.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    use crate::schema::all_tables;

    for ddl in all_tables(&client.config().table) {
        client
            .inner()
            .query(&ddl)
            .execute()
            .await
            .map_err(|e| Error::persist(format!("Failed to execute DDL: {}", e)))?;
    }

    debug!("ClickHouse schema initialized");
    Ok(())
}
