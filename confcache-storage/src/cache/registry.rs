//! Registry mapping partition identifiers to their cache/lock pairs.
//!
//! The registry is an explicit, constructor-injected object owned by
//! whichever component composes the cache provider. There is no process
//! global: two providers with two registries have fully independent caches.

use confcache_core::{CacheConfig, CacheResult, ConfigValue, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::partition::Partition;
use crate::store::ConfigStore;

/// Process-wide (per composition root) map from partition identifier to its
/// [`Partition`] pair.
///
/// Get-or-create is idempotent under unbounded concurrency: construction
/// races collapse to a single winner and losers observe the winner's
/// instance. Partitions live until the registry is dropped; they are never
/// torn down individually.
#[derive(Debug)]
pub struct CacheRegistry {
    config: CacheConfig,
    partitions: RwLock<HashMap<String, Arc<Partition>>>,
}

impl CacheRegistry {
    /// Create a registry applying `config.cache_timeout` to every partition.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            partitions: RwLock::new(HashMap::new()),
        }
    }

    /// The configuration this registry stamps onto new partitions.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Resolve a partition's cache/lock pair, creating it on first access.
    ///
    /// Exactly one pair is ever constructed per distinct identifier; the
    /// double-checked write ensures concurrent first accesses all observe
    /// the same instance. Does not seed; see [`Self::partition`].
    pub async fn get_or_create(&self, partition_id: &str) -> Arc<Partition> {
        if let Some(part) = self.partitions.read().await.get(partition_id) {
            return Arc::clone(part);
        }

        let mut partitions = self.partitions.write().await;
        Arc::clone(
            partitions
                .entry(partition_id.to_string())
                .or_insert_with(|| Arc::new(Partition::new(self.config.cache_timeout))),
        )
    }

    /// Resolve a partition and run its one-time bulk seed.
    ///
    /// The first caller queries the store for every row under the partition
    /// and writes them all with the configured TTL; concurrent callers await
    /// that in-flight seed rather than issuing their own query. A failed seed
    /// is logged and re-raised, and leaves the partition unseeded so the next
    /// access retries.
    pub async fn partition<S>(&self, partition_id: &str, store: &S) -> CacheResult<Arc<Partition>>
    where
        S: ConfigStore + ?Sized,
    {
        let part = self.get_or_create(partition_id).await;

        part.seeded
            .get_or_try_init(|| async {
                tracing::debug!(partition = partition_id, "seeding partition cache");
                let rows = store.query_all(partition_id).await.map_err(|e| {
                    tracing::error!(
                        partition = partition_id,
                        error = %e,
                        "bulk seed query failed"
                    );
                    e
                })?;

                let mut guard = part.lock().write().await;
                for (key, value) in rows {
                    guard.cache_mut().insert(key, ConfigValue::Text(value));
                }
                Ok::<(), StoreError>(())
            })
            .await?;

        Ok(part)
    }

    /// Number of partitions created so far.
    pub async fn len(&self) -> usize {
        self.partitions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.partitions.read().await.is_empty()
    }
}
