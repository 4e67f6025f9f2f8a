//! Store gateway trait.
//!
//! Every backend owns one collection of users keyed by [`UserId`] and
//! enforces id uniqueness itself. Multi-step operations (`insert`,
//! `replace_all`) run inside a single exclusive section so concurrent
//! callers never observe a half-applied change.

use async_trait::async_trait;
use roster_core::{ListQuery, Page, RosterResult, StorageError, User, UserId};
use std::collections::HashSet;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Replace the whole collection with `users`.
    ///
    /// Atomic: on error the previous collection is left untouched. A set
    /// containing duplicate ids is rejected with `AlreadyExists`.
    async fn replace_all(&self, users: Vec<User>) -> RosterResult<()>;

    /// Insert a new user, failing with `AlreadyExists` if the id is taken.
    async fn insert(&self, user: User) -> RosterResult<User>;

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Remove one user. Returns the number removed (0 or 1).
    async fn delete_by_id(&self, id: UserId) -> RosterResult<u64>;

    /// Remove every user. Returns the number removed.
    async fn delete_all(&self) -> RosterResult<u64>;

    /// Sorted, paginated listing.
    async fn list(&self, query: &ListQuery) -> RosterResult<Page<User>>;

    async fn count(&self) -> RosterResult<u64>;
}

/// Reject replacement sets that repeat an id.
pub(crate) fn ensure_unique_ids(users: &[User]) -> RosterResult<()> {
    let mut seen = HashSet::with_capacity(users.len());
    for user in users {
        if !seen.insert(user.id) {
            return Err(StorageError::AlreadyExists { id: user.id }.into());
        }
    }
    Ok(())
}
