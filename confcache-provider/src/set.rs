//! Partition-bound typed accessors.
//!
//! A [`ConfigSet`] pins a partition and reads values through any provider as
//! concrete types. Accessors are deliberately forgiving: provider errors and
//! parse failures both degrade to the caller's default, so reading a config
//! value can never fail outward.

use confcache_core::{coerce, CacheResult, ConfigPrimitive};
use std::sync::Arc;

use crate::provider::ConfigProvider;

/// Typed view of one partition's configuration values.
#[derive(Clone)]
pub struct ConfigSet {
    provider: Arc<dyn ConfigProvider>,
    partition: String,
}

impl ConfigSet {
    pub fn new(provider: Arc<dyn ConfigProvider>, partition: impl Into<String>) -> Self {
        Self {
            provider,
            partition: partition.into(),
        }
    }

    /// The partition this set reads from.
    pub fn partition(&self) -> &str {
        &self.partition
    }

    async fn get_coerced<T: ConfigPrimitive>(&self, key: &str, default: T) -> T {
        match self.provider.get_raw(&self.partition, key, "").await {
            Ok(raw) => coerce(&raw, default).into_inner(),
            Err(_) => default,
        }
    }

    pub async fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_coerced(key, default).await
    }

    pub async fn get_string(&self, key: &str, default: &str) -> String {
        match self.provider.get_raw(&self.partition, key, default).await {
            Ok(raw) => raw,
            Err(_) => default.to_string(),
        }
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_coerced(key, default).await
    }

    pub async fn get_decimal(&self, key: &str, default: f64) -> f64 {
        self.get_coerced(key, default).await
    }

    /// Nullable int: a parseable value yields `Some`, anything else yields
    /// the caller's default (which may itself be `None`).
    pub async fn get_int_opt(&self, key: &str, default: Option<i64>) -> Option<i64> {
        match self.provider.get_raw(&self.partition, key, "").await {
            Ok(raw) => i64::parse_raw(&raw).or(default),
            Err(_) => default,
        }
    }

    /// Nullable bool, same fallback shape as [`Self::get_int_opt`].
    pub async fn get_bool_opt(&self, key: &str, default: Option<bool>) -> Option<bool> {
        match self.provider.get_raw(&self.partition, key, "").await {
            Ok(raw) => bool::parse_raw(&raw).or(default),
            Err(_) => default,
        }
    }

    pub async fn get_json(&self, key: &str, default: serde_json::Value) -> serde_json::Value {
        self.get_coerced(key, default).await
    }

    /// Raw multi-key read. Unlike the typed accessors this propagates
    /// provider errors, matching the underlying multi-get surface.
    pub async fn get_by_keys(&self, keys: &[&str]) -> CacheResult<Vec<(String, String)>> {
        self.provider.get_raw_many(&self.partition, keys).await
    }
}
