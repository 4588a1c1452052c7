//! Object store seam and latest-file selection.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use pricing_core::{Error, ObjectRef, Result};
use tracing::debug;

/// A listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
        }
    }
}

/// Read access to a bucket-organized object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the full body of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Lists every object whose key starts with `prefix`.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;
}

/// Picks the most recently modified object whose key ends with `suffix`.
///
/// Objects are scanned in listing order and an equal timestamp replaces the
/// current pick, so ties go to the last one seen.
pub fn latest_candidate<'a>(
    objects: &'a [ObjectSummary],
    suffix: &str,
) -> Option<&'a ObjectSummary> {
    let mut latest: Option<&ObjectSummary> = None;
    for object in objects.iter().filter(|o| o.key.ends_with(suffix)) {
        match latest {
            Some(current) if object.last_modified < current.last_modified => {}
            _ => latest = Some(object),
        }
    }
    latest
}

/// Lists `prefix`, selects the latest `suffix` object, and downloads it.
pub async fn download_latest(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    suffix: &str,
) -> Result<(ObjectRef, Bytes)> {
    let objects = store.list_objects(bucket, prefix).await?;

    let latest = latest_candidate(&objects, suffix).ok_or_else(|| Error::NoCandidateFile {
        bucket: bucket.to_string(),
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
    })?;

    debug!(
        bucket = bucket,
        key = %latest.key,
        last_modified = %latest.last_modified,
        listed = objects.len(),
        "Selected latest object"
    );

    let body = store.get_object(bucket, &latest.key).await?;
    Ok((ObjectRef::new(bucket, latest.key.clone()), body))
}
