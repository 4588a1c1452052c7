//! S3 configuration.

use serde::{Deserialize, Serialize};

/// S3 client configuration.
///
/// Credentials always come from the default AWS provider chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region (falls back to the provider chain when unset)
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint, e.g. MinIO or LocalStack
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (required by most S3-compatible servers)
    #[serde(default)]
    pub force_path_style: bool,
}

impl S3Config {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self.force_path_style = true;
        self
    }
}
