//! LMDB-backed user store.
//!
//! Uses the heed crate (Rust bindings for LMDB). One unnamed database maps
//! an order-preserving 8-byte encoding of the [`UserId`] to the user's JSON
//! document.
//!
//! # Atomicity
//!
//! LMDB allows a single writer at a time. `insert` checks for the id and
//! writes it inside one write transaction; `replace_all` clears and
//! refills inside one write transaction, so readers see either the old or
//! the new collection and an aborted reload leaves the old one intact.

use std::path::Path;

use async_trait::async_trait;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use roster_core::{paginate, ListQuery, Page, RosterError, RosterResult, StorageError, User, UserId};
use tracing::debug;

use crate::store::{ensure_unique_ids, UserStore};

/// Error type for LMDB store operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error during {operation}: {reason}")]
    Transaction {
        operation: &'static str,
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStoreError> for RosterError {
    fn from(e: LmdbStoreError) -> Self {
        let operation = match &e {
            LmdbStoreError::EnvOpen(_) | LmdbStoreError::DbOpen(_) | LmdbStoreError::Io(_) => "open",
            LmdbStoreError::Transaction { operation, .. } => *operation,
        };
        RosterError::Storage(StorageError::Backend {
            operation,
            reason: e.to_string(),
        })
    }
}

fn txn_error(operation: &'static str) -> impl FnOnce(heed::Error) -> LmdbStoreError {
    move |e| LmdbStoreError::Transaction {
        operation,
        reason: e.to_string(),
    }
}

/// Encode an id so that byte order matches numeric order.
fn encode_key(id: UserId) -> [u8; 8] {
    ((id.get() as u64) ^ (1 << 63)).to_be_bytes()
}

/// Persistent user store on an LMDB environment.
pub struct LmdbUserStore {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbUserStore {
    /// Open (or create) a store in `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `map_size_mb` - Maximum size of the database in megabytes
    pub fn open<P: AsRef<Path>>(path: P, map_size_mb: usize) -> Result<Self, LmdbStoreError> {
        let map_size = map_size_mb
            .max(1)
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                LmdbStoreError::EnvOpen(format!("map size of {map_size_mb} MB is too large"))
            })?;

        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per directory by this process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(txn_error("open"))?;
        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;
        wtxn.commit().map_err(txn_error("open"))?;

        debug!(path = %path.as_ref().display(), "Opened LMDB user store");
        Ok(Self { env, db })
    }

    fn read_all(&self) -> RosterResult<Vec<User>> {
        let rtxn = self.env.read_txn().map_err(txn_error("list"))?;
        let iter = self.db.iter(&rtxn).map_err(txn_error("list"))?;
        let mut users = Vec::new();
        for entry in iter {
            let (_, bytes) = entry.map_err(txn_error("list"))?;
            users.push(serde_json::from_slice(bytes)?);
        }
        Ok(users)
    }
}

#[async_trait]
impl UserStore for LmdbUserStore {
    async fn replace_all(&self, users: Vec<User>) -> RosterResult<()> {
        ensure_unique_ids(&users)?;
        let encoded = users
            .iter()
            .map(|user| -> RosterResult<([u8; 8], Vec<u8>)> {
                Ok((encode_key(user.id), serde_json::to_vec(user)?))
            })
            .collect::<RosterResult<Vec<_>>>()?;

        let mut wtxn = self.env.write_txn().map_err(txn_error("replace_all"))?;
        self.db.clear(&mut wtxn).map_err(txn_error("replace_all"))?;
        for (key, value) in &encoded {
            self.db
                .put(&mut wtxn, key.as_slice(), value)
                .map_err(txn_error("replace_all"))?;
        }
        wtxn.commit().map_err(txn_error("replace_all"))?;

        debug!(users = encoded.len(), "Replaced user collection");
        Ok(())
    }

    async fn insert(&self, user: User) -> RosterResult<User> {
        let key = encode_key(user.id);
        let value = serde_json::to_vec(&user)?;

        let mut wtxn = self.env.write_txn().map_err(txn_error("insert"))?;
        let exists = self
            .db
            .get(&wtxn, key.as_slice())
            .map_err(txn_error("insert"))?
            .is_some();
        if exists {
            // Dropping the transaction aborts it.
            return Err(StorageError::AlreadyExists { id: user.id }.into());
        }
        self.db
            .put(&mut wtxn, key.as_slice(), &value)
            .map_err(txn_error("insert"))?;
        wtxn.commit().map_err(txn_error("insert"))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        let rtxn = self.env.read_txn().map_err(txn_error("find_by_id"))?;
        match self
            .db
            .get(&rtxn, encode_key(id).as_slice())
            .map_err(txn_error("find_by_id"))?
        {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<u64> {
        let mut wtxn = self.env.write_txn().map_err(txn_error("delete_by_id"))?;
        let deleted = self
            .db
            .delete(&mut wtxn, encode_key(id).as_slice())
            .map_err(txn_error("delete_by_id"))?;
        wtxn.commit().map_err(txn_error("delete_by_id"))?;
        Ok(u64::from(deleted))
    }

    async fn delete_all(&self) -> RosterResult<u64> {
        let mut wtxn = self.env.write_txn().map_err(txn_error("delete_all"))?;
        let removed = self.db.len(&wtxn).map_err(txn_error("delete_all"))?;
        self.db.clear(&mut wtxn).map_err(txn_error("delete_all"))?;
        wtxn.commit().map_err(txn_error("delete_all"))?;
        Ok(removed)
    }

    async fn list(&self, query: &ListQuery) -> RosterResult<Page<User>> {
        let users = self.read_all()?;
        Ok(paginate(users, query))
    }

    async fn count(&self) -> RosterResult<u64> {
        let rtxn = self.env.read_txn().map_err(txn_error("count"))?;
        Ok(self.db.len(&rtxn).map_err(txn_error("count"))?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
