//! Short-lived read cache for single-record lookups.
//!
//! Entries live for a fixed TTL from the moment they are stored and are
//! dropped lazily the next time they are read after expiry. The cache is
//! never invalidated by writes: a lookup may return a record that was
//! changed or deleted in the store for up to one TTL afterwards. Reads
//! return a [`CacheRead<T>`] that records whether the value came from the
//! cache or from storage.
//!
//! # Example
//!
//! ```ignore
//! let cache = ReadThroughCache::with_defaults(Arc::new(InMemoryCacheBackend::new()));
//!
//! let read = cache.get::<User, _>(user_id, &fetcher).await?;
//! if let Some(read) = read {
//!     tracing::debug!(from_cache = read.was_cache_hit(), "user lookup");
//! }
//! ```

pub mod key;
pub mod memory;
pub mod read;
pub mod read_through;
pub mod traits;

pub use key::CacheKey;
pub use memory::InMemoryCacheBackend;
pub use read::CacheRead;
pub use read_through::{CacheConfig, ReadThroughCache, StorageFetcher, DEFAULT_ENTRY_TTL};
pub use traits::{CacheBackend, CacheStats, CacheableEntity};
