//! confcache provider - public configuration access surface
//!
//! Two provider variants front the authoritative store:
//!
//! - [`CachedConfigProvider`]: read-oriented, partitioned TTL cache with
//!   lock-guarded lazy population. Writes are not supported; issue them
//!   against the store (or the realtime variant) directly.
//! - [`RealtimeConfigProvider`]: no caching at all; every read and write hits
//!   the store. Use it when write-then-immediate-read consistency is needed.
//!
//! [`ConfigSet`] layers partition-bound typed accessors over either variant,
//! and [`ConfigManager`] is the constructor-injected composition root.

pub mod cached;
pub mod manager;
pub mod provider;
pub mod realtime;
pub mod set;

pub use cached::CachedConfigProvider;
pub use manager::ConfigManager;
pub use provider::ConfigProvider;
pub use realtime::RealtimeConfigProvider;
pub use set::ConfigSet;
