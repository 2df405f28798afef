//! confcache test utilities
//!
//! Shared test doubles for downstream crates:
//! - [`RecordingStore`]: a [`ConfigStore`] wrapper counting queries per
//!   partition and injecting faults, for asserting seed-once behavior and
//!   batch write isolation.

// Re-export the in-memory store for convenience in tests.
pub use confcache_storage::MemoryStore;

use async_trait::async_trait;
use confcache_core::{StoreError, WriteError};
use confcache_storage::ConfigStore;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Store wrapper that records read-query counts and injects failures.
///
/// Counters cover the two queries the cache issues: the bulk seed
/// (`query_all`) and the key-blind miss query (`query_first`). Write faults
/// are keyed: any batch containing a failing key aborts before anything is
/// delegated, so nothing is persisted.
pub struct RecordingStore<S: ConfigStore> {
    inner: S,
    query_all_calls: Mutex<HashMap<String, usize>>,
    query_first_calls: Mutex<HashMap<String, usize>>,
    fail_upsert_keys: HashSet<String>,
    fail_reads: AtomicBool,
}

impl<S: ConfigStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            query_all_calls: Mutex::new(HashMap::new()),
            query_first_calls: Mutex::new(HashMap::new()),
            fail_upsert_keys: HashSet::new(),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make upserts fail for the given keys.
    pub fn fail_upserts_for(mut self, keys: &[&str]) -> Self {
        self.fail_upsert_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Toggle failure of all read queries from now on.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// How many bulk-seed queries were issued against a partition.
    pub fn query_all_count(&self, partition: &str) -> usize {
        *self
            .query_all_calls
            .lock()
            .unwrap()
            .get(partition)
            .unwrap_or(&0)
    }

    /// How many per-key miss queries were issued against a partition.
    pub fn query_first_count(&self, partition: &str) -> usize {
        *self
            .query_first_calls
            .lock()
            .unwrap()
            .get(partition)
            .unwrap_or(&0)
    }

    /// Access the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn read_fault(&self, partition: &str) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::QueryFailed {
                partition: partition.to_string(),
                reason: "injected read failure".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn record(map: &Mutex<HashMap<String, usize>>, partition: &str) {
        *map.lock().unwrap().entry(partition.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl<S: ConfigStore> ConfigStore for RecordingStore<S> {
    async fn query_all(&self, partition: &str) -> Result<Vec<(String, String)>, StoreError> {
        self.read_fault(partition)?;
        Self::record(&self.query_all_calls, partition);
        self.inner.query_all(partition).await
    }

    async fn query_first(&self, partition: &str) -> Result<Option<String>, StoreError> {
        self.read_fault(partition)?;
        Self::record(&self.query_first_calls, partition);
        self.inner.query_first(partition).await
    }

    async fn query_value(
        &self,
        partition: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        self.read_fault(partition)?;
        self.inner.query_value(partition, key).await
    }

    async fn query_keys(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> Result<Vec<(String, String)>, StoreError> {
        self.read_fault(partition)?;
        self.inner.query_keys(partition, keys).await
    }

    async fn upsert_one(
        &self,
        partition: &str,
        key: &str,
        value: &str,
    ) -> Result<(), WriteError> {
        if self.fail_upsert_keys.contains(key) {
            return Err(WriteError::UpsertFailed {
                key: key.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.inner.upsert_one(partition, key, value).await
    }

    async fn upsert_many(
        &self,
        partition: &str,
        items: &[(String, String)],
    ) -> Result<(), WriteError> {
        // Abort before delegating anything: all-or-nothing, first failing
        // key named in the error.
        if let Some((key, _)) = items.iter().find(|(k, _)| self.fail_upsert_keys.contains(k)) {
            return Err(WriteError::BatchAborted {
                key: key.clone(),
                reason: "injected write failure".to_string(),
            });
        }
        self.inner.upsert_many(partition, items).await
    }
}
