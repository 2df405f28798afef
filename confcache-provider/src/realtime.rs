//! Realtime provider: no local caching, every call hits the store.
//!
//! Suited to configuration that is written and immediately read back; reads
//! here use the keyed store queries rather than the cached variant's
//! key-blind miss query.

use async_trait::async_trait;
use confcache_core::CacheResult;
use confcache_storage::ConfigStore;
use std::sync::Arc;

use crate::provider::ConfigProvider;

/// Pass-through provider over the authoritative store.
pub struct RealtimeConfigProvider<S: ConfigStore> {
    store: Arc<S>,
}

impl<S: ConfigStore> RealtimeConfigProvider<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: ConfigStore> ConfigProvider for RealtimeConfigProvider<S> {
    async fn get_raw(&self, partition: &str, key: &str, default: &str) -> CacheResult<String> {
        let value = self.store.query_value(partition, key).await?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    async fn get_raw_many(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> CacheResult<Vec<(String, String)>> {
        Ok(self.store.query_keys(partition, keys).await?)
    }

    async fn set_raw(&self, partition: &str, key: &str, value: &str) -> CacheResult<()> {
        Ok(self.store.upsert_one(partition, key, value).await?)
    }

    async fn set_raw_many(&self, partition: &str, items: &[(String, String)]) -> CacheResult<()> {
        Ok(self.store.upsert_many(partition, items).await?)
    }

    /// No-op: this provider holds no state to reload.
    async fn reload(&self) -> CacheResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confcache_storage::MemoryStore;

    #[tokio::test]
    async fn test_read_after_write_is_immediate() {
        let store = Arc::new(MemoryStore::new());
        let provider = RealtimeConfigProvider::new(Arc::clone(&store));

        provider.set_raw("p1", "k", "v1").await.unwrap();
        assert_eq!(provider.get_raw("p1", "k", "").await.unwrap(), "v1");

        provider.set_raw("p1", "k", "v2").await.unwrap();
        assert_eq!(provider.get_raw("p1", "k", "").await.unwrap(), "v2");
    }

    #[tokio::test]
    async fn test_get_raw_defaults_when_absent() {
        let provider = RealtimeConfigProvider::new(Arc::new(MemoryStore::new()));
        assert_eq!(
            provider.get_raw("p1", "missing", "fallback").await.unwrap(),
            "fallback"
        );
    }

    #[tokio::test]
    async fn test_get_raw_many_uses_keyed_query() {
        let store = Arc::new(MemoryStore::with_rows("p1", &[("a", "1"), ("b", "2")]).await);
        let provider = RealtimeConfigProvider::new(store);

        let got = provider.get_raw_many("p1", &["b"]).await.unwrap();
        assert_eq!(got, vec![("b".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_reload_is_noop() {
        let provider = RealtimeConfigProvider::new(Arc::new(MemoryStore::new()));
        provider.reload().await.unwrap();
    }
}
