//! ROSTER Storage - User Store Gateway and Read Cache
//!
//! Defines the [`UserStore`] abstraction with an in-memory and an LMDB
//! backend, plus the TTL read cache used for single-user lookups.

pub mod cache;
pub mod config;
pub mod lmdb;
pub mod memory;
pub mod store;

pub use cache::{
    CacheBackend, CacheConfig, CacheKey, CacheRead, CacheStats, CacheableEntity,
    InMemoryCacheBackend, ReadThroughCache, StorageFetcher, DEFAULT_ENTRY_TTL,
};
pub use config::{StoreConfig, DEFAULT_MAP_SIZE_MB};
pub use lmdb::{LmdbStoreError, LmdbUserStore};
pub use memory::InMemoryUserStore;
pub use store::UserStore;
