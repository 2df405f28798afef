//! Caching provider: partitioned, lazy-populating, TTL-stamped reads.
//!
//! Suited to configuration that changes rarely. On a miss, only one caller
//! per partition pays the store round-trip; everyone else waits on the
//! partition's upgradeable lock and reads the populated entry.

use async_trait::async_trait;
use confcache_core::{coerce, CacheConfig, CacheError, CacheResult, ConfigPrimitive};
use confcache_storage::{CacheRegistry, ConfigStore};
use std::sync::Arc;

use crate::provider::ConfigProvider;

/// Read-oriented provider backed by a partitioned TTL cache.
///
/// Writes are deliberately unsupported here: `set_raw`, `set_raw_many`, and
/// `reload` return [`CacheError::NotSupported`]. Issue writes against the
/// authoritative store, or use [`crate::RealtimeConfigProvider`] when a write
/// must be immediately readable.
pub struct CachedConfigProvider<S: ConfigStore> {
    store: Arc<S>,
    registry: Arc<CacheRegistry>,
}

impl<S: ConfigStore> CachedConfigProvider<S> {
    /// Create a provider owning a fresh registry configured by `config`.
    pub fn new(store: Arc<S>, config: CacheConfig) -> Self {
        Self::with_registry(store, Arc::new(CacheRegistry::new(config)))
    }

    /// Create a provider over an externally owned registry.
    ///
    /// Providers sharing a registry share partitions; providers with
    /// separate registries are fully independent. Nothing is process-global.
    pub fn with_registry(store: Arc<S>, registry: Arc<CacheRegistry>) -> Self {
        Self { store, registry }
    }

    /// The registry backing this provider.
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    /// Typed read of one configuration value.
    ///
    /// The full read path, per key:
    ///
    /// 1. Resolve the partition pair, running the one-time bulk seed if this
    ///    is the partition's first access.
    /// 2. Acquire the partition's upgradeable read lock.
    /// 3. On a hit whose representation already matches `T`, return it as-is
    ///    (no expiry check on point reads; carried behavior).
    /// 4. On a hit with a different representation, coerce the raw form to
    ///    `T` with `default` as fallback, then overwrite the entry with the
    ///    original value re-armed with a fresh TTL. Every coerced read
    ///    silently refreshes the entry's expiry.
    /// 5. On a miss, upgrade to exclusive write and re-query the store. The
    ///    query is key-blind (partition only, first row wins) — an inherited
    ///    aliasing hazard for partitions holding several keys, preserved as
    ///    documented behavior. Coerce, insert with TTL, downgrade, return.
    ///
    /// Coercion failures degrade to `default` and never error; store failures
    /// are logged and re-raised. The guards are RAII, so the lock is released
    /// on every path including the error return.
    pub async fn get<T: ConfigPrimitive>(
        &self,
        partition: &str,
        key: &str,
        default: T,
    ) -> CacheResult<T> {
        let part = self.registry.partition(partition, self.store.as_ref()).await?;
        let guard = part.lock().upgradeable_read().await;

        let cached = guard.cache().entry(key).map(|e| e.value.clone());
        if let Some(value) = cached {
            if let Some(exact) = T::from_exact(&value) {
                return Ok(exact);
            }

            let coerced = coerce(&value.raw(), default).into_inner();
            let mut write = guard.upgrade().await;
            write.cache_mut().insert(key, value);
            return Ok(coerced);
        }

        // Miss: the upgradeable slot is held from the check above through the
        // populate below, so no concurrent populate can interleave.
        let mut write = guard.upgrade().await;
        let row = self.store.query_first(partition).await.map_err(|e| {
            tracing::error!(partition, key, error = %e, "store query failed on cache miss");
            e
        })?;

        let value = match row {
            Some(raw) => coerce(&raw, default).into_inner(),
            None => default,
        };
        write.cache_mut().insert(key, value.clone().into_value());

        let _read = write.downgrade();
        Ok(value)
    }
}

#[async_trait]
impl<S: ConfigStore> ConfigProvider for CachedConfigProvider<S> {
    async fn get_raw(&self, partition: &str, key: &str, default: &str) -> CacheResult<String> {
        self.get::<String>(partition, key, default.to_string()).await
    }

    async fn get_raw_many(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> CacheResult<Vec<(String, String)>> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self.get::<String>(partition, key, String::new()).await?;
            out.push((key.to_string(), value));
        }
        Ok(out)
    }

    async fn set_raw(&self, _partition: &str, _key: &str, _value: &str) -> CacheResult<()> {
        Err(CacheError::NotSupported {
            operation: "set_raw (write to the authoritative store directly)".to_string(),
        })
    }

    async fn set_raw_many(
        &self,
        _partition: &str,
        _items: &[(String, String)],
    ) -> CacheResult<()> {
        Err(CacheError::NotSupported {
            operation: "set_raw_many (write to the authoritative store directly)".to_string(),
        })
    }

    async fn reload(&self) -> CacheResult<()> {
        Err(CacheError::NotSupported {
            operation: "reload".to_string(),
        })
    }
}
