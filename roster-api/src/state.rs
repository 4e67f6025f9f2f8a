//! Shared application state for Axum routers.

use std::sync::Arc;

use roster_source::DataSource;
use roster_storage::{CacheConfig, InMemoryCacheBackend, ReadThroughCache, UserStore};

use crate::cached_store::{CachedUserStore, UserCache};

/// Application-wide state shared across all routes.
///
/// Constructed once by the caller and handed to the router; nothing here is
/// a process-wide singleton, so tests can run isolated instances side by
/// side.
#[derive(Clone)]
pub struct AppState {
    /// Raw user store, for everything except single-user reads.
    pub store: Arc<dyn UserStore>,
    /// Store wrapped with the read-through cache.
    pub cached_store: CachedUserStore,
    /// Upstream source consulted by the load pipeline.
    pub source: Arc<dyn DataSource>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        source: Arc<dyn DataSource>,
        cache_config: CacheConfig,
    ) -> Self {
        let cache: Arc<UserCache> = Arc::new(ReadThroughCache::new(
            Arc::new(InMemoryCacheBackend::new()),
            cache_config,
        ));

        Self {
            cached_store: CachedUserStore::new(Arc::clone(&store), cache),
            store,
            source,
            start_time: std::time::Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<dyn UserStore>, store);
crate::impl_from_ref!(CachedUserStore, cached_store);
crate::impl_from_ref!(Arc<dyn DataSource>, source);
crate::impl_from_ref!(std::time::Instant, start_time);
