use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{KeyValueStore, StoreError};

/// Read-through cache in front of another store.
///
/// Writes go to the backend first and then drop the cached key. Entries also expire after `ttl`
/// so changes made by another instance sharing the backend show up eventually.
///
/// `generation` moves on every write or reload. A miss that raced with one of those does not keep
/// the value it fetched, so an old value can never be put back after its invalidation.
pub struct CachedStore {
    inner: Arc<dyn KeyValueStore>,
    cache: Cache<String, String>,
    generation: AtomicU64,
}

impl CachedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(ttl)
                .build(),
            generation: AtomicU64::new(0),
        }
    }

    /// Load every backend entry into the cache.
    pub async fn warmup(&self) -> Result<()> {
        let started = self.generation();
        let entries = self.inner.list().await?;
        let total = entries.len();

        for (key, value) in entries {
            self.cache.insert(key, value).await;
        }
        if self.generation() != started {
            self.cache.invalidate_all();
        }

        log::info!("Store cache warmup complete: {} keys", total);
        Ok(())
    }

    /// Forget everything cached; the next reads go to the backend.
    pub fn reload(&self) {
        self.bump();
        self.cache.invalidate_all();
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for CachedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.cache.get(key).await {
            return Ok(Some(value));
        }

        let started = self.generation();
        let value = self.inner.get(key).await?;
        if let Some(v) = &value {
            if self.generation() == started {
                self.cache.insert(key.to_string(), v.clone()).await;
                // a write may have landed between the check and the insert
                if self.generation() != started {
                    self.cache.invalidate(key).await;
                }
            }
        }
        Ok(value)
    }

    async fn get_fresh(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await?;
        self.bump();
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await?;
        self.bump();
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        self.inner.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::test_support::GatedStore;

    fn cached(backend: Arc<MemoryStore>) -> CachedStore {
        CachedStore::new(backend, Duration::from_secs(60))
    }

    #[actix_web::test]
    async fn test_reads_are_cached_until_reload() {
        let backend = Arc::new(MemoryStore::default());
        backend.set("k", "v1").await.unwrap();
        let store = cached(backend.clone());

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));

        // a write that bypasses the cache is not seen yet
        backend.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));

        store.reload();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[actix_web::test]
    async fn test_writes_invalidate() {
        let backend = Arc::new(MemoryStore::default());
        let store = cached(backend.clone());

        store.set("k", "v1").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(backend.get("k").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_miss_racing_a_write_is_not_cached() {
        let backend = Arc::new(GatedStore::default());
        backend.set("k", "old").await.unwrap();
        let store = CachedStore::new(backend.clone(), Duration::from_secs(60));

        let (fetched, release) = backend.hold_next_get();
        let reader = store.get("k");
        let writer = async {
            fetched.await.unwrap();
            store.set("k", "new").await.unwrap();
            release.send(()).unwrap();
        };
        let (seen, ()) = futures::join!(reader, writer);
        assert_eq!(seen.unwrap().as_deref(), Some("old"));

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    #[actix_web::test]
    async fn test_get_fresh_skips_the_cache() {
        let backend = Arc::new(MemoryStore::default());
        backend.set("k", "v1").await.unwrap();
        let store = cached(backend.clone());

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
        backend.set("k", "v2").await.unwrap();
        assert_eq!(store.get_fresh("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
    }

    #[actix_web::test]
    async fn test_warmup_loads_all_entries() {
        let backend = Arc::new(MemoryStore::default());
        backend.set("a", "1").await.unwrap();
        backend.set("b", "2").await.unwrap();
        let store = cached(backend.clone());

        store.warmup().await.unwrap();
        backend.delete("a").await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
