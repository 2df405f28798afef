//! Error types for confcache operations.

use thiserror::Error;

/// Errors from the authoritative store's read path.
///
/// These are never absorbed by the cache: a failed store query is logged and
/// re-raised to the caller, in contrast with coercion failures which degrade
/// to the caller's default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Query failed for partition '{partition}': {reason}")]
    QueryFailed { partition: String, reason: String },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Typed write failures from the authoritative store.
///
/// Writes report failure as a value, never a panic; a batch failure names the
/// first item that could not be persisted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("Write operations are not supported by this backend: {reason}")]
    UnsupportedBackend { reason: String },

    #[error("Upsert failed for key '{key}': {reason}")]
    UpsertFailed { key: String, reason: String },

    #[error("Batch aborted at key '{key}': {reason}; no items were persisted")]
    BatchAborted { key: String, reason: String },
}

/// Master error type for confcache operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// The provider does not implement the requested operation. Distinct from
    /// a store failure: the operation must be issued elsewhere (e.g. writes
    /// go to the authoritative store, not the caching provider).
    #[error("Operation not supported by this provider: {operation}")]
    NotSupported { operation: String },
}

/// Result type alias for confcache operations.
pub type CacheResult<T> = Result<T, CacheError>;
