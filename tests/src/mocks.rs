//! Mock implementations for testing.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use clickhouse_client::PriceAverageSink;
use parking_lot::Mutex;
use pricing_core::{EnrichedRecord, Error, Result};
use s3_store::{ObjectStore, ObjectSummary};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone)]
struct StoredObject {
    body: Bytes,
    last_modified: DateTime<Utc>,
}

/// In-memory object store keyed by (bucket, key).
///
/// Listing returns objects in insertion order, the way a real listing returns
/// them in an order the caller does not control.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<BTreeMap<(String, String), StoredObject>>>,
    order: Arc<Mutex<Vec<(String, String)>>>,
    gets: Arc<Mutex<Vec<String>>>,
    fail_gets: Arc<Mutex<bool>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object.
    pub fn put(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        last_modified: DateTime<Utc>,
    ) {
        let id = (bucket.to_string(), key.to_string());
        let previous = self.objects.lock().insert(
            id.clone(),
            StoredObject {
                body: body.into(),
                last_modified,
            },
        );
        if previous.is_none() {
            self.order.lock().push(id);
        }
    }

    /// Keys fetched so far, in order.
    pub fn fetched_keys(&self) -> Vec<String> {
        self.gets.lock().clone()
    }

    /// Make every `get_object` fail.
    pub fn set_fail_gets(&self, fail: bool) {
        *self.fail_gets.lock() = fail;
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        if *self.fail_gets.lock() {
            return Err(Error::download("Mock store failure"));
        }

        self.gets.lock().push(key.to_string());
        self.objects
            .lock()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.body.clone())
            .ok_or_else(|| Error::download(format!("NoSuchKey: s3://{}/{}", bucket, key)))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let objects = self.objects.lock();
        Ok(self
            .order
            .lock()
            .iter()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .filter_map(|id| {
                objects
                    .get(id)
                    .map(|o| ObjectSummary::new(id.1.clone(), o.last_modified))
            })
            .collect())
    }
}

/// Sink that captures each replace-all call in memory.
#[derive(Clone, Default)]
pub struct MockSink {
    batches: Arc<Mutex<Vec<Vec<EnrichedRecord>>>>,
    unreachable: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records from the most recent replace-all, if any.
    pub fn stored(&self) -> Option<Vec<EnrichedRecord>> {
        self.batches.lock().last().cloned()
    }

    /// Number of replace-all calls that succeeded.
    pub fn replace_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// Simulate an unreachable backend.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock() = unreachable;
    }

    /// Simulate a failing write.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

#[async_trait]
impl PriceAverageSink for MockSink {
    async fn check(&self) -> Result<()> {
        if *self.unreachable.lock() {
            return Err(Error::connection("Mock sink unreachable"));
        }
        Ok(())
    }

    async fn replace_all(&self, records: &[EnrichedRecord]) -> Result<usize> {
        if *self.fail_writes.lock() {
            return Err(Error::persist("Mock sink write failure"));
        }
        self.batches.lock().push(records.to_vec());
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_mock_store_lists_by_prefix_in_insertion_order() {
        let store = MockObjectStore::new();
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.put("b", "p/z.csv", "1", t);
        store.put("b", "p/a.csv", "2", t);
        store.put("b", "q/a.csv", "3", t);
        store.put("other", "p/x.csv", "4", t);

        let keys: Vec<String> = store
            .list_objects("b", "p/")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["p/z.csv", "p/a.csv"]);

        assert_eq!(&store.get_object("b", "q/a.csv").await.unwrap()[..], b"3");
        assert_eq!(store.fetched_keys(), vec!["q/a.csv"]);
    }

    #[tokio::test]
    async fn test_mock_sink_failure_modes() {
        let sink = MockSink::new();
        assert!(sink.check().await.is_ok());

        sink.set_unreachable(true);
        assert!(matches!(sink.check().await, Err(Error::Connection(_))));

        sink.set_fail_writes(true);
        assert!(sink.replace_all(&[]).await.is_err());
        assert_eq!(sink.replace_count(), 0);
    }
}
