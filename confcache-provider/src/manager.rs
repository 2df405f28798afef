//! Composition root for configuration access.
//!
//! The manager is constructor-injected: callers build it with whichever
//! provider variant they need and pass it around explicitly. There is no
//! static default instance and no hidden service locator.

use confcache_core::CacheResult;
use std::sync::Arc;

use crate::provider::ConfigProvider;
use crate::set::ConfigSet;

/// Entry point handing out partition-bound [`ConfigSet`]s and forwarding
/// writes to the underlying provider.
#[derive(Clone)]
pub struct ConfigManager {
    provider: Arc<dyn ConfigProvider>,
}

impl ConfigManager {
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    /// A typed view of one partition. An empty string is a valid partition.
    pub fn config_set(&self, partition: impl Into<String>) -> ConfigSet {
        ConfigSet::new(Arc::clone(&self.provider), partition)
    }

    /// Write one value through the provider.
    pub async fn set_value(&self, partition: &str, key: &str, value: &str) -> CacheResult<()> {
        self.provider.set_raw(partition, key, value).await
    }

    /// Write a batch through the provider, all-or-nothing.
    pub async fn set_values(
        &self,
        partition: &str,
        items: &[(String, String)],
    ) -> CacheResult<()> {
        self.provider.set_raw_many(partition, items).await
    }
}
