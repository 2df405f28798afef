//! confcache core - value representation, coercion, configuration, errors
//!
//! Leaf types shared by the storage and provider crates. Nothing here
//! performs I/O; the cache algorithm lives in `confcache-storage` and the
//! public provider surface in `confcache-provider`.

pub mod config;
pub mod error;
pub mod value;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult, StoreError, WriteError};
pub use value::{coerce, Coerced, ConfigPrimitive, ConfigValue, ValueKind};
