//! Read-through cache with a fixed entry TTL.
//!
//! On a hit younger than the TTL the cached value is returned as-is. On a
//! miss (absent or expired) the storage fetcher is consulted and, if the
//! record exists, the cache is populated with a fresh TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use roster_core::RosterResult;
use tokio::time::Instant;
use tracing::trace;

use super::key::CacheKey;
use super::read::CacheRead;
use super::traits::{CacheBackend, CacheStats, CacheableEntity};

/// Default lifetime of a cached entry.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(60);

/// Configuration for the read-through cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry stays servable after it is stored.
    pub entry_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_ENTRY_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }
}

/// Storage fetcher trait for retrieving entities on a cache miss.
#[async_trait]
pub trait StorageFetcher<T: CacheableEntity>: Send + Sync {
    async fn fetch(&self, id: T::Id) -> RosterResult<Option<T>>;
}

/// Read-through cache over a pluggable backend.
pub struct ReadThroughCache<C>
where
    C: CacheBackend,
{
    backend: Arc<C>,
    config: CacheConfig,
}

impl<C> ReadThroughCache<C>
where
    C: CacheBackend,
{
    pub fn new(backend: Arc<C>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    pub fn with_defaults(backend: Arc<C>) -> Self {
        Self::new(backend, CacheConfig::default())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Return the cached entry if it is younger than the TTL.
    ///
    /// Expired entries are removed as a side effect.
    pub async fn lookup<T: CacheableEntity>(&self, id: T::Id) -> RosterResult<Option<CacheRead<T>>> {
        let Some((value, cached_at)) = self.backend.get::<T>(id).await? else {
            return Ok(None);
        };

        if cached_at.elapsed() < self.config.entry_ttl {
            return Ok(Some(CacheRead::from_cache(value, cached_at)));
        }

        trace!(key = %CacheKey::of::<T>(id), "Dropping expired cache entry");
        self.backend.delete::<T>(id).await?;
        Ok(None)
    }

    /// Store an entity with a TTL starting now.
    pub async fn put<T: CacheableEntity>(&self, entity: &T) -> RosterResult<()> {
        self.backend.put(entity, Instant::now()).await
    }

    /// Cached read, falling back to `storage` on a miss.
    ///
    /// Absent records are not cached, so a later insert is visible on the
    /// next read.
    pub async fn get<T, S>(&self, id: T::Id, storage: &S) -> RosterResult<Option<CacheRead<T>>>
    where
        T: CacheableEntity,
        S: StorageFetcher<T> + ?Sized,
    {
        if let Some(read) = self.lookup::<T>(id).await? {
            return Ok(Some(read));
        }

        match storage.fetch(id).await? {
            Some(entity) => {
                self.put(&entity).await?;
                Ok(Some(CacheRead::from_storage(entity)))
            }
            None => Ok(None),
        }
    }

    pub async fn stats(&self) -> RosterResult<CacheStats> {
        self.backend.stats().await
    }
}

impl<C> Clone for ReadThroughCache<C>
where
    C: CacheBackend,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheBackend;
    use roster_core::{User, UserId};
    use roster_test_utils::fixtures::user;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    struct MockStorageFetcher {
        users: RwLock<HashMap<UserId, User>>,
        fetches: AtomicUsize,
    }

    impl MockStorageFetcher {
        fn new(users: Vec<User>) -> Self {
            Self {
                users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StorageFetcher<User> for MockStorageFetcher {
        async fn fetch(&self, id: UserId) -> RosterResult<Option<User>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.read().await.get(&id).cloned())
        }
    }

    fn cache() -> ReadThroughCache<InMemoryCacheBackend> {
        ReadThroughCache::with_defaults(Arc::new(InMemoryCacheBackend::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_then_hit_within_ttl() {
        let cache = cache();
        let storage = MockStorageFetcher::new(vec![user(1, "Leanne")]);

        let first = cache
            .get::<User, _>(UserId::new(1), &storage)
            .await
            .expect("get should succeed")
            .expect("user should exist");
        assert!(first.was_cache_miss());

        tokio::time::advance(Duration::from_secs(59)).await;

        let second = cache
            .get::<User, _>(UserId::new(1), &storage)
            .await
            .expect("get should succeed")
            .expect("user should exist");
        assert!(second.was_cache_hit());
        assert_eq!(second.into_value(), user(1, "Leanne"));
        assert_eq!(storage.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache();
        cache.put(&user(1, "Leanne")).await.expect("put should succeed");

        assert!(cache
            .lookup::<User>(UserId::new(1))
            .await
            .expect("lookup should succeed")
            .is_some());

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(cache
            .lookup::<User>(UserId::new(1))
            .await
            .expect("lookup should succeed")
            .is_none());
        assert!(cache.backend().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let cache = cache();
        let storage = MockStorageFetcher::new(vec![user(1, "Leanne")]);

        let _ = cache.get::<User, _>(UserId::new(1), &storage).await.expect("get");
        tokio::time::advance(Duration::from_secs(60)).await;

        let read = cache
            .get::<User, _>(UserId::new(1), &storage)
            .await
            .expect("get should succeed")
            .expect("user should exist");
        assert!(read.was_cache_miss());
        assert_eq!(storage.fetches(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let cache = cache();
        let storage = MockStorageFetcher::new(vec![]);

        let result = cache
            .get::<User, _>(UserId::new(9), &storage)
            .await
            .expect("get should succeed");
        assert!(result.is_none());
        assert!(cache.backend().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_ttl() {
        let config = CacheConfig::new().with_ttl(Duration::from_secs(5));
        let cache = ReadThroughCache::new(Arc::new(InMemoryCacheBackend::new()), config);
        cache.put(&user(2, "Ervin")).await.expect("put should succeed");

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache
            .lookup::<User>(UserId::new(2))
            .await
            .expect("lookup should succeed")
            .is_none());
    }
}
