//! Cached User Store
//!
//! `CachedUserStore` pairs the user store with the read-through cache.
//! Only single-user reads go through the cache; writes, deletes and loads
//! neither populate nor invalidate it, so a read may be stale for up to the
//! entry TTL after a mutation.

use async_trait::async_trait;
use roster_core::{RosterResult, User, UserId};
use roster_storage::{
    CacheRead, InMemoryCacheBackend, ReadThroughCache, StorageFetcher, UserStore,
};
use std::sync::Arc;

/// Cache type used by the API.
pub type UserCache = ReadThroughCache<InMemoryCacheBackend>;

#[derive(Clone)]
pub struct CachedUserStore {
    store: Arc<dyn UserStore>,
    cache: Arc<UserCache>,
}

impl CachedUserStore {
    pub fn new(store: Arc<dyn UserStore>, cache: Arc<UserCache>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &UserCache {
        &self.cache
    }

    /// Get a user, checking the cache first.
    ///
    /// The returned `CacheRead` records whether the value was served from
    /// the cache.
    pub async fn user_get(&self, id: UserId) -> RosterResult<Option<CacheRead<User>>> {
        let fetcher = UserFetcher {
            store: self.store.as_ref(),
        };
        self.cache.get::<User, _>(id, &fetcher).await
    }
}

// ============================================================================
// STORAGE FETCHER
// ============================================================================

struct UserFetcher<'a> {
    store: &'a dyn UserStore,
}

#[async_trait]
impl<'a> StorageFetcher<User> for UserFetcher<'a> {
    async fn fetch(&self, id: UserId) -> RosterResult<Option<User>> {
        self.store.find_by_id(id).await
    }
}
