//! Store backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use roster_core::RosterResult;
use tracing::info;

use crate::lmdb::LmdbUserStore;
use crate::memory::InMemoryUserStore;
use crate::store::UserStore;

/// Default LMDB map size in megabytes.
pub const DEFAULT_MAP_SIZE_MB: usize = 64;

/// Which store backs the user collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// LMDB directory; `None` keeps everything in memory.
    pub path: Option<PathBuf>,
    pub map_size_mb: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            map_size_mb: DEFAULT_MAP_SIZE_MB,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// `ROSTER_STORE_PATH` enables LMDB persistence in that directory;
    /// `ROSTER_STORE_MAP_SIZE_MB` bounds the map size.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var("ROSTER_STORE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            map_size_mb: std::env::var("ROSTER_STORE_MAP_SIZE_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAP_SIZE_MB),
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn lmdb(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Open the configured backend.
    pub fn open(&self) -> RosterResult<Arc<dyn UserStore>> {
        match &self.path {
            Some(path) => {
                let store = LmdbUserStore::open(path, self.map_size_mb)?;
                info!(path = %path.display(), map_size_mb = self.map_size_mb, "Using LMDB user store");
                Ok(Arc::new(store))
            }
            None => {
                info!("Using in-memory user store");
                Ok(Arc::new(InMemoryUserStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{User, UserId};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_in_memory() {
        let store = StoreConfig::in_memory().open().expect("open should succeed");
        assert_eq!(store.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_open_lmdb_creates_directory() {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let path = temp_dir.path().join("nested").join("store");

        let store = StoreConfig::lmdb(&path).open().expect("open should succeed");
        store
            .insert(User::new(UserId::new(1)))
            .await
            .expect("insert should succeed");

        assert!(path.exists());
        assert_eq!(store.count().await.expect("count"), 1);
    }
}
