//! ClickHouse configuration.

use serde::{Deserialize, Serialize};

/// ClickHouse client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHouseConfig {
    /// ClickHouse HTTP URL
    pub url: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Username (optional)
    pub username: Option<String>,
    /// Password (optional)
    pub password: Option<String>,
    /// Table receiving enriched price averages
    #[serde(default = "default_table")]
    pub table: String,
    /// Query timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database() -> String {
    "auctions".to_string()
}

fn default_table() -> String {
    "price_averages".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".to_string(),
            database: default_database(),
            username: None,
            password: None,
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClickHouseConfig {
    /// Table one replace-all write stages its rows into before swapping.
    ///
    /// `token` keeps concurrent writers from sharing a staging table.
    pub fn staging_table(&self, token: &str) -> String {
        format!("{}_staging_{}", self.table, token)
    }
}
