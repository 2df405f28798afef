//! Provider trait: the raw-string configuration surface.

use async_trait::async_trait;
use confcache_core::CacheResult;

/// Object-safe configuration provider surface.
///
/// Values cross this boundary in their raw string form; typed access layers
/// on top via [`crate::ConfigSet`] or the cached provider's inherent generic
/// `get`. Implementations that do not support an operation return
/// [`confcache_core::CacheError::NotSupported`] rather than failing silently.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Read one value, falling back to `default` when no row matches.
    async fn get_raw(&self, partition: &str, key: &str, default: &str) -> CacheResult<String>;

    /// Read several values. Each key is resolved independently; there is no
    /// batching optimization on the cached variant.
    async fn get_raw_many(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> CacheResult<Vec<(String, String)>>;

    /// Insert or update one value in the authoritative store.
    async fn set_raw(&self, partition: &str, key: &str, value: &str) -> CacheResult<()>;

    /// Insert or update a batch, all-or-nothing.
    async fn set_raw_many(&self, partition: &str, items: &[(String, String)]) -> CacheResult<()>;

    /// Reload provider state, where the provider holds any.
    async fn reload(&self) -> CacheResult<()>;
}
