//! Per-partition entry map and its upgradeable reader/writer lock.
//!
//! The upgradeable lock lifecycle is an explicit state machine over native
//! primitives: a mutex holds the single "upgradeable" slot, and a reader/
//! writer lock holds the entry map itself.
//!
//! ```text
//! upgradeable_read() ──→ UpgradeableReadGuard ── upgrade() ──→ PartitionWriteGuard
//!        │                        │                                   │
//!        │                     (drop)                            downgrade()
//!        └── plain read() ────────┴───────────────────────────────────┘
//! ```
//!
//! Invariants:
//! - at most one task holds the upgradeable slot per partition, so the
//!   check-then-populate sequence on a miss cannot race with another populate;
//! - plain readers proceed concurrently with an upgradeable holder, and are
//!   excluded only while an upgrade holds the write half;
//! - every cache access goes through a guard, and guards are RAII, so the
//!   lock is released on every exit path including error returns.

use chrono::{DateTime, Utc};
use confcache_core::ConfigValue;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard, OnceCell, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A single cached configuration value with its expiry timestamp.
///
/// Entries are created on population and overwritten on re-coercion. They are
/// never purged by a background sweep: an expired entry lingers until the
/// next write, and the point-read path performs no timestamp check (carried
/// behavior of the source system).
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The cached value, in whatever representation was last written.
    pub value: ConfigValue,
    /// When the entry's TTL elapses.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Check if the entry's TTL has elapsed as of `now`.
    ///
    /// Consulted by enumeration, not by point reads.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// One partition's key -> entry map plus the TTL stamped on every write.
#[derive(Debug)]
pub struct PartitionCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl PartitionCache {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// The TTL applied to entries written into this partition.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up an entry. No expiry check is performed here.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Insert or overwrite an entry, arming it with a fresh TTL.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        let ttl = chrono::Duration::from_std(self.ttl)
            .unwrap_or_else(|_| chrono::Duration::milliseconds(self.ttl.as_millis() as i64));
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Utc::now() + ttl,
            },
        );
    }

    /// Number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the entries whose TTL has not elapsed as of `now`.
    ///
    /// This is the only place expiry is honored; point reads return expired
    /// entries as-is.
    pub fn live_entries(
        &self,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries
            .iter()
            .filter(move |(_, e)| !e.is_expired(now))
            .map(|(k, e)| (k.as_str(), e))
    }
}

/// Upgradeable reader/writer lock guarding one [`PartitionCache`].
///
/// The entry map lives inside the lock, so there is no unguarded access path.
#[derive(Debug)]
pub struct PartitionLock {
    /// The single upgradeable slot. Held across check-then-populate.
    upgrade: Mutex<()>,
    inner: RwLock<PartitionCache>,
}

impl PartitionLock {
    fn new(ttl: Duration) -> Self {
        Self {
            upgrade: Mutex::new(()),
            inner: RwLock::new(PartitionCache::new(ttl)),
        }
    }

    /// Acquire the upgradeable read mode: shared with plain readers, but
    /// exclusive of other upgradeable holders.
    pub async fn upgradeable_read(&self) -> UpgradeableReadGuard<'_> {
        let slot = self.upgrade.lock().await;
        let read = self.inner.read().await;
        UpgradeableReadGuard {
            lock: self,
            slot,
            read,
        }
    }

    /// Acquire a plain read guard. Proceeds alongside an upgradeable holder.
    pub async fn read(&self) -> RwLockReadGuard<'_, PartitionCache> {
        self.inner.read().await
    }

    /// Acquire exclusive write access directly (used by partition seeding).
    pub async fn write(&self) -> PartitionWriteGuard<'_> {
        let slot = self.upgrade.lock().await;
        let write = self.inner.write().await;
        PartitionWriteGuard {
            lock: self,
            slot,
            write,
        }
    }
}

/// Guard for the upgradeable read mode.
pub struct UpgradeableReadGuard<'a> {
    lock: &'a PartitionLock,
    slot: MutexGuard<'a, ()>,
    read: RwLockReadGuard<'a, PartitionCache>,
}

impl<'a> UpgradeableReadGuard<'a> {
    /// Read access to the guarded cache.
    pub fn cache(&self) -> &PartitionCache {
        &self.read
    }

    /// Escalate to exclusive write without giving up the upgradeable slot.
    ///
    /// The slot is held throughout, so no other task can populate between
    /// the read that observed a miss and the write that fills it. Plain
    /// readers drain before the write half is granted.
    pub async fn upgrade(self) -> PartitionWriteGuard<'a> {
        let UpgradeableReadGuard { lock, slot, read } = self;
        drop(read);
        let write = lock.inner.write().await;
        PartitionWriteGuard { lock, slot, write }
    }
}

/// Guard for exclusive write access, still holding the upgradeable slot.
pub struct PartitionWriteGuard<'a> {
    lock: &'a PartitionLock,
    slot: MutexGuard<'a, ()>,
    write: RwLockWriteGuard<'a, PartitionCache>,
}

impl<'a> PartitionWriteGuard<'a> {
    pub fn cache(&self) -> &PartitionCache {
        &self.write
    }

    pub fn cache_mut(&mut self) -> &mut PartitionCache {
        &mut self.write
    }

    /// Drop back to the upgradeable read mode, readmitting plain readers.
    pub fn downgrade(self) -> UpgradeableReadGuard<'a> {
        let PartitionWriteGuard { lock, slot, write } = self;
        let read = write.downgrade();
        UpgradeableReadGuard { lock, slot, read }
    }
}

/// A partition's cache and lock pair, plus its one-time seeding cell.
///
/// Created at most once per partition identifier and never torn down.
#[derive(Debug)]
pub struct Partition {
    lock: PartitionLock,
    pub(crate) seeded: OnceCell<()>,
}

impl Partition {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            lock: PartitionLock::new(ttl),
            seeded: OnceCell::new(),
        }
    }

    /// The lock guarding this partition's cache.
    pub fn lock(&self) -> &PartitionLock {
        &self.lock
    }

    /// Whether the one-time bulk seed has completed.
    pub fn is_seeded(&self) -> bool {
        self.seeded.initialized()
    }
}
