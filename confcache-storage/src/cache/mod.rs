//! Partitioned lazy-populating TTL cache.
//!
//! One [`Partition`] (entry map + upgradeable lock) exists per partition
//! identifier, created at most once through the [`CacheRegistry`] and never
//! torn down. Population is lock-guarded so that on a miss only one caller
//! per partition pays the store round-trip.

pub mod partition;
pub mod registry;

pub use partition::{
    CacheEntry, Partition, PartitionCache, PartitionLock, PartitionWriteGuard,
    UpgradeableReadGuard,
};
pub use registry::CacheRegistry;
