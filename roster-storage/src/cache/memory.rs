//! In-process cache backend over a sharded concurrent map.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use roster_core::RosterResult;
use tokio::time::Instant;

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheStats, CacheableEntity};

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    cached_at: Instant,
}

/// Type-erased in-memory cache. Values are stored as-is, without
/// serialization, and cloned out on read.
#[derive(Default)]
pub struct InMemoryCacheBackend {
    entries: DashMap<CacheKey, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get<T: CacheableEntity>(&self, id: T::Id) -> RosterResult<Option<(T, Instant)>> {
        let key = CacheKey::of::<T>(id);
        let found = self.entries.get(&key).and_then(|entry| {
            entry
                .value
                .downcast_ref::<T>()
                .map(|value| (value.clone(), entry.cached_at))
        });

        match found {
            Some(hit) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(hit))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn put<T: CacheableEntity>(&self, entity: &T, cached_at: Instant) -> RosterResult<()> {
        self.entries.insert(
            CacheKey::for_entity(entity),
            CacheEntry {
                value: Arc::new(entity.clone()),
                cached_at,
            },
        );
        Ok(())
    }

    async fn delete<T: CacheableEntity>(&self, id: T::Id) -> RosterResult<bool> {
        Ok(self.entries.remove(&CacheKey::of::<T>(id)).is_some())
    }

    async fn stats(&self) -> RosterResult<CacheStats> {
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.entries.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{User, UserId};
    use roster_test_utils::fixtures::user;

    #[tokio::test]
    async fn test_put_and_get() {
        let backend = InMemoryCacheBackend::new();
        let cached_at = Instant::now();

        backend
            .put(&user(1, "Leanne"), cached_at)
            .await
            .expect("put should succeed");

        let (value, at) = backend
            .get::<User>(UserId::new(1))
            .await
            .expect("get should succeed")
            .expect("entry should be present");
        assert_eq!(value, user(1, "Leanne"));
        assert_eq!(at, cached_at);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_entry() {
        let backend = InMemoryCacheBackend::new();
        backend.put(&user(1, "old"), Instant::now()).await.expect("put");
        backend.put(&user(1, "new"), Instant::now()).await.expect("put");

        let (value, _) = backend
            .get::<User>(UserId::new(1))
            .await
            .expect("get should succeed")
            .expect("entry should be present");
        assert_eq!(value.name(), Some("new"));
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let backend = InMemoryCacheBackend::new();
        backend.put(&user(1, "a"), Instant::now()).await.expect("put");
        backend.put(&user(2, "b"), Instant::now()).await.expect("put");

        assert!(backend.delete::<User>(UserId::new(1)).await.expect("delete"));
        assert!(!backend.delete::<User>(UserId::new(1)).await.expect("delete"));
        assert_eq!(backend.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let backend = InMemoryCacheBackend::new();
        backend.put(&user(1, "a"), Instant::now()).await.expect("put");

        let _ = backend.get::<User>(UserId::new(1)).await.expect("get");
        let _ = backend.get::<User>(UserId::new(2)).await.expect("get");
        let _ = backend.get::<User>(UserId::new(1)).await.expect("get");

        let stats = backend.stats().await.expect("stats");
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 1);
    }
}
