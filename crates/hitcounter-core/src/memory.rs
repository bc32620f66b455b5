use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{HitKey, HitRecord};
use crate::store::HitStore;

/// In-process hit storage keyed the same way as the DynamoDB table.
#[derive(Default)]
pub struct MemoryStore {
    hits: Mutex<BTreeMap<HitKey, HitRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored hits.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The record stored under `key`, if any.
    pub fn get(&self, key: &HitKey) -> Option<HitRecord> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<HitKey, HitRecord>> {
        // A panic while holding the lock cannot leave a half-written map.
        self.hits.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HitStore for MemoryStore {
    async fn record_hit(&self, record: &HitRecord) -> Result<(), CoreError> {
        self.lock().insert(record.key(), record.clone());
        Ok(())
    }

    async fn scan_hits(&self) -> Result<Vec<HitRecord>, CoreError> {
        Ok(self.lock().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn make_record(path: &str, millis: i64, body: &str) -> HitRecord {
        HitRecord {
            path: path.into(),
            timestamp_millis: millis,
            timestamp: "2021-06-01-12:30:05".into(),
            http_method: "POST".into(),
            body: Some(body.into()),
            query_parameters: None,
            extra: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn distinct_keys_are_kept() {
        let store = MemoryStore::new();
        store.record_hit(&make_record("/a", 1, "x")).await.unwrap();
        store.record_hit(&make_record("/b", 1, "x")).await.unwrap();
        store.record_hit(&make_record("/a", 2, "x")).await.unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.scan_hits().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn same_key_overwrites() {
        let store = MemoryStore::new();
        store.record_hit(&make_record("/a", 1, "first")).await.unwrap();
        store.record_hit(&make_record("/a", 1, "second")).await.unwrap();

        assert_eq!(store.len(), 1);
        let stored = store.get(&make_record("/a", 1, "").key()).unwrap();
        assert_eq!(stored.body.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn concurrent_writes_to_one_key_leave_one_whole_record() {
        let store = Arc::new(MemoryStore::new());
        let first = make_record("/race", 42, "one");
        let second = make_record("/race", 42, "two");

        let a = {
            let store = Arc::clone(&store);
            let record = first.clone();
            tokio::spawn(async move { store.record_hit(&record).await })
        };
        let b = {
            let store = Arc::clone(&store);
            let record = second.clone();
            tokio::spawn(async move { store.record_hit(&record).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let hits = store.scan_hits().await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0] == first || hits[0] == second);
    }

    #[tokio::test]
    async fn empty_store_scans_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.scan_hits().await.unwrap().is_empty());
    }
}
