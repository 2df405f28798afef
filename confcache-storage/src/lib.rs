//! confcache storage - store abstraction and the cache core
//!
//! Defines the authoritative-store seam ([`ConfigStore`]), an in-memory
//! reference implementation ([`MemoryStore`]), and the partitioned
//! lazy-populating TTL cache: per-partition entry maps guarded by an
//! upgradeable reader/writer lock, resolved through an injected
//! [`CacheRegistry`].

pub mod cache;
pub mod memory;
pub mod store;

pub use cache::{
    CacheEntry, CacheRegistry, Partition, PartitionCache, PartitionLock, PartitionWriteGuard,
    UpgradeableReadGuard,
};
pub use memory::MemoryStore;
pub use store::ConfigStore;
