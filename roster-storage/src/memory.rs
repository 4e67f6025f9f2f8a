//! In-memory user store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::{paginate, ListQuery, Page, RosterResult, StorageError, User, UserId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{ensure_unique_ids, UserStore};

/// Users held in an id-ordered map behind one async lock.
///
/// The write lock is the exclusive section for check-then-insert and for
/// the swap performed by `replace_all`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `users`.
    pub fn with_users(users: Vec<User>) -> RosterResult<Self> {
        ensure_unique_ids(&users)?;
        let map = users.into_iter().map(|user| (user.id, user)).collect();
        Ok(Self {
            users: RwLock::new(map),
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn replace_all(&self, users: Vec<User>) -> RosterResult<()> {
        ensure_unique_ids(&users)?;
        let replacement: BTreeMap<UserId, User> =
            users.into_iter().map(|user| (user.id, user)).collect();

        let mut guard = self.users.write().await;
        debug!(previous = guard.len(), next = replacement.len(), "Replacing user collection");
        *guard = replacement;
        Ok(())
    }

    async fn insert(&self, user: User) -> RosterResult<User> {
        let mut guard = self.users.write().await;
        if guard.contains_key(&user.id) {
            return Err(StorageError::AlreadyExists { id: user.id }.into());
        }
        guard.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<u64> {
        let removed = self.users.write().await.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_all(&self) -> RosterResult<u64> {
        let mut guard = self.users.write().await;
        let removed = guard.len() as u64;
        guard.clear();
        Ok(removed)
    }

    async fn list(&self, query: &ListQuery) -> RosterResult<Page<User>> {
        let snapshot: Vec<User> = self.users.read().await.values().cloned().collect();
        Ok(paginate(snapshot, query))
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}

// =============================================================================
// TESTS
// =============================================================================
