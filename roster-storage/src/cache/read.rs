//! Result wrapper for cache-aware reads.

use std::time::Duration;
use tokio::time::Instant;

/// A value together with where it came from.
///
/// Callers inspect [`was_cache_hit`](Self::was_cache_hit) before unwrapping
/// with [`into_value`](Self::into_value).
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    value: T,
    /// When the value was cached, or fetched from storage on a miss.
    cached_at: Instant,
    was_cache_hit: bool,
}

impl<T> CacheRead<T> {
    /// Create a new cache read from a cache hit.
    pub fn from_cache(value: T, cached_at: Instant) -> Self {
        Self {
            value,
            cached_at,
            was_cache_hit: true,
        }
    }

    /// Create a new cache read from a storage fetch (cache miss).
    pub fn from_storage(value: T) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
            was_cache_hit: false,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Time since the value was cached or fetched.
    pub fn age(&self) -> Duration {
        self.cached_at.elapsed()
    }

    pub fn was_cache_hit(&self) -> bool {
        self.was_cache_hit
    }

    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_age_follows_clock() {
        let read = CacheRead::from_storage(5u32);
        assert!(read.was_cache_miss());
        assert_eq!(read.age(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(read.age(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_age_counts_from_insertion() {
        let at = Instant::now();
        tokio::time::advance(Duration::from_secs(10)).await;

        let read = CacheRead::from_cache(2u32, at);
        assert!(read.was_cache_hit());
        assert_eq!(read.age(), Duration::from_secs(10));
        assert_eq!(read.into_value(), 2);
    }
}
