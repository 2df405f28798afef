//! End-to-end tests for the caching provider over a recording store.

use confcache_core::{CacheConfig, CacheError, StoreError, WriteError};
use confcache_core::ConfigValue;
use confcache_provider::{CachedConfigProvider, ConfigProvider};
use confcache_storage::ConfigStore;
use confcache_test_utils::{MemoryStore, RecordingStore};
use std::sync::Arc;
use std::time::Duration;

async fn recording_store(
    partition: &str,
    rows: &[(&str, &str)],
) -> Arc<RecordingStore<MemoryStore>> {
    Arc::new(RecordingStore::new(MemoryStore::with_rows(partition, rows).await))
}

#[tokio::test]
async fn test_empty_partition_returns_default_with_one_seed_query() {
    let store = recording_store("p1", &[]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    let got = provider.get::<i64>("p1", "x", 42).await.unwrap();
    assert_eq!(got, 42);
    assert_eq!(store.query_all_count("p1"), 1);
}

#[tokio::test]
async fn test_cached_hit_skips_second_store_query() {
    let store = recording_store("p1", &[("x", "7")]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    assert_eq!(provider.get::<i64>("p1", "x", 0).await.unwrap(), 7);
    assert_eq!(provider.get::<i64>("p1", "x", 0).await.unwrap(), 7);

    // Seeded once; the hit path never issued a per-key query.
    assert_eq!(store.query_all_count("p1"), 1);
    assert_eq!(store.query_first_count("p1"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_first_reads_seed_once() {
    let store = recording_store("p1", &[("x", "7")]).await;
    let provider = Arc::new(CachedConfigProvider::new(
        Arc::clone(&store),
        CacheConfig::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            provider.get::<i64>("p1", "x", 0).await.unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 7);
    }

    assert_eq!(store.query_all_count("p1"), 1);
}

#[tokio::test]
async fn test_reading_one_partition_does_not_create_another() {
    let store = recording_store("a", &[("k", "v")]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    provider.get::<String>("a", "k", String::new()).await.unwrap();

    assert_eq!(provider.registry().len().await, 1);
    assert_eq!(store.query_all_count("a"), 1);
    assert_eq!(store.query_all_count("b"), 0);
}

#[tokio::test]
async fn test_unparseable_value_returns_caller_default() {
    let store = recording_store("p1", &[("x", "definitely-not-an-int")]).await;
    let provider = CachedConfigProvider::new(store, CacheConfig::default());

    assert_eq!(provider.get::<i64>("p1", "x", 99).await.unwrap(), 99);
}

#[tokio::test]
async fn test_recoercion_refreshes_entry_expiry() {
    let store = recording_store("p1", &[("x", "7")]).await;
    let provider = CachedConfigProvider::new(store, CacheConfig::default());

    provider.get::<String>("p1", "x", String::new()).await.unwrap();
    let first_expiry = {
        let part = provider.registry().get_or_create("p1").await;
        let cache = part.lock().read().await;
        cache.entry("x").unwrap().expires_at
    };

    tokio::time::sleep(Duration::from_millis(20)).await;

    // Same key, different requested type: the coerced read rewrites the
    // entry with a fresh TTL.
    assert_eq!(provider.get::<i64>("p1", "x", 0).await.unwrap(), 7);
    let second_expiry = {
        let part = provider.registry().get_or_create("p1").await;
        let cache = part.lock().read().await;
        cache.entry("x").unwrap().expires_at
    };

    assert!(second_expiry > first_expiry);
}

#[tokio::test]
async fn test_recoercion_preserves_original_representation() {
    let store = recording_store("p1", &[("x", "7")]).await;
    let provider = CachedConfigProvider::new(store, CacheConfig::default());

    // Seeded as text; the int read coerces but writes the original back.
    assert_eq!(provider.get::<i64>("p1", "x", 0).await.unwrap(), 7);

    let part = provider.registry().get_or_create("p1").await;
    let cache = part.lock().read().await;
    assert_eq!(
        cache.entry("x").unwrap().value,
        ConfigValue::Text("7".to_string())
    );
}

#[tokio::test]
async fn test_miss_populate_stores_coerced_representation() {
    let store = recording_store("p1", &[]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    // Key absent everywhere: the coerced default is cached as an int.
    assert_eq!(provider.get::<i64>("p1", "n", 5).await.unwrap(), 5);

    let part = provider.registry().get_or_create("p1").await;
    {
        let cache = part.lock().read().await;
        assert_eq!(cache.entry("n").unwrap().value, ConfigValue::Int(5));
    }

    // The exact-representation hit path returns it without another query.
    assert_eq!(provider.get::<i64>("p1", "n", 0).await.unwrap(), 5);
    assert_eq!(store.query_first_count("p1"), 1);
}

#[tokio::test]
async fn test_miss_query_is_key_blind() {
    // Carried behavior: the miss path queries by partition only and takes
    // the first row, so an unknown key aliases to it.
    let store = recording_store("p1", &[("x", "1"), ("y", "2")]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    assert_eq!(provider.get::<i64>("p1", "zzz", 0).await.unwrap(), 1);
    assert_eq!(store.query_first_count("p1"), 1);
}

#[tokio::test]
async fn test_store_failure_on_miss_is_reraised_and_lock_released() {
    let store = recording_store("p1", &[("x", "7")]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    // Seed first, then break the store and force a miss.
    provider.get::<i64>("p1", "x", 0).await.unwrap();
    store.set_fail_reads(true);

    let err = provider.get::<i64>("p1", "new-key", 0).await.unwrap_err();
    assert!(matches!(
        err,
        CacheError::Store(StoreError::QueryFailed { .. })
    ));

    // The guard was released on the error path: cached reads still work.
    store.set_fail_reads(false);
    assert_eq!(provider.get::<i64>("p1", "x", 0).await.unwrap(), 7);
}

#[tokio::test]
async fn test_writes_are_not_supported_on_cached_provider() {
    let store = recording_store("p1", &[]).await;
    let provider = CachedConfigProvider::new(store, CacheConfig::default());

    let err = provider.set_raw("p1", "k", "v").await.unwrap_err();
    assert!(matches!(err, CacheError::NotSupported { .. }));

    let err = provider
        .set_raw_many("p1", &[("k".to_string(), "v".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::NotSupported { .. }));

    let err = provider.reload().await.unwrap_err();
    assert!(matches!(err, CacheError::NotSupported { .. }));
}

#[tokio::test]
async fn test_get_raw_many_resolves_keys_independently() {
    let store = recording_store("p1", &[("a", "1"), ("b", "2")]).await;
    let provider = CachedConfigProvider::new(Arc::clone(&store), CacheConfig::default());

    let got = provider.get_raw_many("p1", &["a", "b"]).await.unwrap();
    assert_eq!(
        got,
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string())
        ]
    );
    assert_eq!(store.query_all_count("p1"), 1);
}

#[tokio::test]
async fn test_failed_batch_write_persists_nothing() {
    let store = RecordingStore::new(MemoryStore::new()).fail_upserts_for(&["c"]);

    let items: Vec<(String, String)> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|k| (k.to_string(), "v".to_string()))
        .collect();

    let err = store.upsert_many("p1", &items).await.unwrap_err();
    assert!(matches!(err, WriteError::BatchAborted { ref key, .. } if key == "c"));

    // All-or-nothing: none of the five items landed.
    assert!(store.inner().query_all("p1").await.unwrap().is_empty());
}
