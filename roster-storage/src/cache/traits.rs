//! Cache backend traits and cacheable entity marker.

use async_trait::async_trait;
use roster_core::{RosterResult, User, UserId};
use tokio::time::Instant;

/// Marker trait for types that can be cached.
///
/// `entity_name()` must return the same value for all instances and
/// `entity_id()` must uniquely identify the instance within its kind.
pub trait CacheableEntity: Clone + Send + Sync + 'static {
    /// Typed identifier; widened to `i64` for key construction.
    type Id: Copy + Into<i64> + Send + Sync + 'static;

    fn entity_name() -> &'static str;

    fn entity_id(&self) -> Self::Id;
}

/// Cache backend trait for pluggable cache implementations.
///
/// Implementations must be safe under concurrent readers and writers.
/// `cached_at` is stored verbatim; expiry is decided by the caller.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a value and the instant it was cached, or `None` if absent.
    async fn get<T: CacheableEntity>(&self, id: T::Id) -> RosterResult<Option<(T, Instant)>>;

    /// Store a value, replacing any previous entry for the same key.
    async fn put<T: CacheableEntity>(&self, entity: &T, cached_at: Instant) -> RosterResult<()>;

    /// Remove an entry. Returns whether one was present.
    async fn delete<T: CacheableEntity>(&self, id: T::Id) -> RosterResult<bool>;

    async fn stats(&self) -> RosterResult<CacheStats>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries currently in cache.
    pub entry_count: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ============================================================================
// CACHEABLE ENTITY IMPLEMENTATIONS
// ============================================================================

impl CacheableEntity for User {
    type Id = UserId;

    fn entity_name() -> &'static str {
        UserId::ENTITY_NAME
    }

    fn entity_id(&self) -> UserId {
        self.id
    }
}
