//! In-memory reference implementation of [`ConfigStore`].
//!
//! Rows are kept in insertion order per partition so `query_first` has
//! deterministic "first row" semantics, matching how a database table with
//! no ORDER BY serves the key-blind miss query.

use async_trait::async_trait;
use confcache_core::{StoreError, WriteError};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::store::ConfigStore;

/// Thread-safe in-memory configuration store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Rows indexed by partition, in insertion order.
    rows: RwLock<HashMap<String, Vec<(String, String)>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows for a single partition.
    pub async fn with_rows(partition: &str, rows: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.rows.write().await;
            map.insert(
                partition.to_string(),
                rows.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }
        store
    }

    /// Number of rows stored under a partition.
    pub async fn row_count(&self, partition: &str) -> usize {
        self.rows
            .read()
            .await
            .get(partition)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

fn apply_upsert(rows: &mut Vec<(String, String)>, key: &str, value: &str) {
    match rows.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => rows.push((key.to_string(), value.to_string())),
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn query_all(&self, partition: &str) -> Result<Vec<(String, String)>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.get(partition).cloned().unwrap_or_default())
    }

    async fn query_first(&self, partition: &str) -> Result<Option<String>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(partition)
            .and_then(|r| r.first())
            .map(|(_, v)| v.clone()))
    }

    async fn query_value(
        &self,
        partition: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(partition)
            .and_then(|r| r.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone()))
    }

    async fn query_keys(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> Result<Vec<(String, String)>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(partition)
            .map(|r| {
                r.iter()
                    .filter(|(k, _)| keys.contains(&k.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upsert_one(
        &self,
        partition: &str,
        key: &str,
        value: &str,
    ) -> Result<(), WriteError> {
        let mut rows = self.rows.write().await;
        apply_upsert(rows.entry(partition.to_string()).or_default(), key, value);
        Ok(())
    }

    async fn upsert_many(
        &self,
        partition: &str,
        items: &[(String, String)],
    ) -> Result<(), WriteError> {
        let mut rows = self.rows.write().await;
        // Stage the whole batch against a copy, then commit in one swap.
        let mut staged = rows.get(partition).cloned().unwrap_or_default();
        for (key, value) in items {
            apply_upsert(&mut staged, key, value);
        }
        rows.insert(partition.to_string(), staged);
        Ok(())
    }
}
