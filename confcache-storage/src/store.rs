//! Authoritative store trait.
//!
//! The store is an external collaborator: a key/value table scoped by a
//! partition identifier. The cache treats it as the source of truth and
//! never caches writes.

use async_trait::async_trait;
use confcache_core::{StoreError, WriteError};

/// Async interface to the authoritative configuration store.
///
/// Read failures surface as [`StoreError`] and are re-raised by the cache
/// read path. Write failures are typed [`WriteError`] values; implementations
/// must not panic on unsupported or failing writes.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    // ========================================================================
    // READ OPERATIONS
    // ========================================================================

    /// Fetch every key/value pair under a partition.
    ///
    /// Used once per partition to seed its cache at first access.
    async fn query_all(&self, partition: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Fetch the first value stored under a partition.
    ///
    /// Deliberately key-blind: this is the query the cache miss path issues,
    /// and it filters by partition only. For a partition holding more than
    /// one key the result aliases whichever row comes first. Preserved as
    /// documented behavior; callers needing a keyed read use [`Self::query_value`].
    async fn query_first(&self, partition: &str) -> Result<Option<String>, StoreError>;

    /// Fetch the value stored under `(partition, key)`.
    async fn query_value(&self, partition: &str, key: &str)
        -> Result<Option<String>, StoreError>;

    /// Fetch the values stored under a partition for the given keys.
    ///
    /// Keys with no stored value are omitted from the result.
    async fn query_keys(
        &self,
        partition: &str,
        keys: &[&str],
    ) -> Result<Vec<(String, String)>, StoreError>;

    // ========================================================================
    // WRITE OPERATIONS
    // ========================================================================

    /// Insert or update a single key.
    async fn upsert_one(&self, partition: &str, key: &str, value: &str)
        -> Result<(), WriteError>;

    /// Insert or update a batch of keys, all-or-nothing.
    ///
    /// The first failing item aborts the batch; nothing is persisted and the
    /// returned [`WriteError::BatchAborted`] names that key.
    async fn upsert_many(
        &self,
        partition: &str,
        items: &[(String, String)],
    ) -> Result<(), WriteError>;
}
