//! ROSTER Test Utilities
//!
//! Shared test infrastructure for the ROSTER workspace:
//! - Stub data sources standing in for the upstream service
//! - Proptest generators for users, posts, comments and snapshots
//! - Fixtures shaped like the upstream sample data
//! - Custom assertions for ROSTER error variants

pub use roster_core::{
    Comment, CommentId, FetchError, Post, PostId, RosterError, RosterResult, SourceSnapshot,
    StorageError, User, UserId,
};
pub use roster_source::DataSource;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

// ============================================================================
// STUB SOURCES
// ============================================================================

/// Data source returning a fixed (replaceable) snapshot.
#[derive(Debug)]
pub struct StubSource {
    snapshot: Mutex<SourceSnapshot>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(snapshot: SourceSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    /// Swap the snapshot served by subsequent fetches.
    pub async fn set_snapshot(&self, snapshot: SourceSnapshot) {
        *self.snapshot.lock().await = snapshot;
    }

    /// Number of completed `fetch_snapshot` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new(fixtures::sample_snapshot())
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn fetch_snapshot(&self) -> RosterResult<SourceSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.lock().await.clone())
    }
}

/// Data source that always fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingSource {
    error: FetchError,
}

impl FailingSource {
    pub fn new(error: FetchError) -> Self {
        Self { error }
    }

    /// Fails as if the posts endpoint answered 503.
    pub fn unavailable() -> Self {
        Self::new(FetchError::Status {
            resource: "posts".to_string(),
            status: 503,
        })
    }
}

#[async_trait]
impl DataSource for FailingSource {
    async fn fetch_snapshot(&self) -> RosterResult<SourceSnapshot> {
        Err(self.error.clone().into())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating ROSTER record types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_user_id() -> impl Strategy<Value = UserId> {
        (1i64..1_000).prop_map(UserId::new)
    }

    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,8} [A-Z][a-z]{2,10}"
    }

    pub fn arb_user() -> impl Strategy<Value = User> {
        (arb_user_id(), arb_name(), "[a-z]{3,8}")
            .prop_map(|(id, name, username)| {
                User::new(id)
                    .with_field("name", name)
                    .with_field("username", username.clone())
                    .with_field("email", format!("{username}@example.com"))
            })
    }

    /// Users with distinct ids, in arbitrary order.
    pub fn arb_unique_users(max: usize) -> impl Strategy<Value = Vec<User>> {
        prop::collection::vec(arb_user(), 0..max).prop_map(|users| {
            let mut seen = std::collections::HashSet::new();
            users.into_iter().filter(|u| seen.insert(u.id)).collect()
        })
    }

    pub fn arb_post(user_ids: Vec<UserId>) -> impl Strategy<Value = Post> {
        let owners = if user_ids.is_empty() {
            vec![UserId::new(1)]
        } else {
            user_ids
        };
        (1i64..10_000, prop::sample::select(owners), "[a-z ]{0,20}").prop_map(
            |(id, user_id, title)| Post::new(PostId::new(id), user_id).with_title(title),
        )
    }

    pub fn arb_comment(post_ids: Vec<PostId>) -> impl Strategy<Value = Comment> {
        let parents = if post_ids.is_empty() {
            vec![PostId::new(1)]
        } else {
            post_ids
        };
        (1i64..100_000, prop::sample::select(parents), "[a-z ]{0,30}").prop_map(
            |(id, post_id, body)| Comment::new(CommentId::new(id), post_id).with_field("body", body),
        )
    }

    /// Snapshots whose foreign keys mostly resolve, with occasional orphans.
    pub fn arb_snapshot() -> impl Strategy<Value = SourceSnapshot> {
        arb_unique_users(8).prop_flat_map(|users| {
            let mut owners: Vec<UserId> = users.iter().map(|u| u.id).collect();
            owners.push(UserId::new(-1));
            prop::collection::vec(arb_post(owners), 0..16).prop_flat_map(move |posts| {
                let users = users.clone();
                let mut parents: Vec<PostId> = posts.iter().map(|p| p.id).collect();
                parents.push(PostId::new(-1));
                prop::collection::vec(arb_comment(parents), 0..32).prop_map(move |comments| {
                    SourceSnapshot::new(users.clone(), posts.clone(), comments)
                })
            })
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common test scenarios.

    use super::*;
    use serde_json::json;

    /// A user with just a name.
    pub fn user(id: i64, name: &str) -> User {
        User::new(UserId::new(id)).with_field("name", name)
    }

    pub fn post(id: i64, user_id: i64, title: &str) -> Post {
        Post::new(PostId::new(id), UserId::new(user_id))
            .with_title(title)
            .with_body(format!("body of {title}"))
    }

    pub fn comment(id: i64, post_id: i64, body: &str) -> Comment {
        Comment::new(CommentId::new(id), PostId::new(post_id))
            .with_field("name", format!("comment {id}"))
            .with_field("email", format!("c{id}@example.com"))
            .with_field("body", body)
    }

    /// A fully-populated profile in the upstream shape.
    pub fn profile_user(id: i64, name: &str, username: &str, city: &str) -> User {
        user(id, name)
            .with_field("username", username)
            .with_field("email", format!("{}@example.com", username.to_lowercase()))
            .with_field(
                "address",
                json!({ "street": "Kulas Light", "city": city, "zipcode": "92998-3874" }),
            )
    }

    /// Three users, four posts (one orphaned) and five comments (two
    /// orphaned: one on the orphan post, one on a missing post).
    pub fn sample_snapshot() -> SourceSnapshot {
        SourceSnapshot::new(
            vec![
                profile_user(1, "Leanne Graham", "Bret", "Gwenborough"),
                profile_user(2, "Ervin Howell", "Antonette", "Wisokyburgh"),
                profile_user(3, "Clementine Bauch", "Samantha", "McKenziehaven"),
            ],
            vec![
                post(1, 1, "sunt aut facere"),
                post(2, 1, "qui est esse"),
                post(3, 2, "ea molestias quasi"),
                post(4, 99, "orphan post"),
            ],
            vec![
                comment(1, 1, "laudantium enim"),
                comment(2, 1, "est natus enim"),
                comment(3, 3, "quia molestiae"),
                comment(4, 4, "on orphan post"),
                comment(5, 50, "on missing post"),
            ],
        )
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for ROSTER-specific validation.

    use super::*;

    /// Assert that a RosterResult is an AlreadyExists storage error for `id`.
    #[track_caller]
    pub fn assert_conflict<T: std::fmt::Debug>(result: &RosterResult<T>, id: UserId) {
        match result {
            Err(RosterError::Storage(StorageError::AlreadyExists { id: got })) => {
                assert_eq!(*got, id, "Wrong id in AlreadyExists error");
            }
            other => panic!("Expected AlreadyExists for {id}, got: {other:?}"),
        }
    }

    /// Assert that a RosterResult is a Fetch error.
    #[track_caller]
    pub fn assert_fetch_error<T: std::fmt::Debug>(result: &RosterResult<T>) {
        match result {
            Err(RosterError::Fetch(_)) => {}
            other => panic!("Expected Fetch error, got: {other:?}"),
        }
    }

    /// Assert every merged user carries exactly its own posts, and every
    /// post exactly its own comments.
    #[track_caller]
    pub fn assert_nesting_consistent(users: &[User]) {
        for user in users {
            let posts = user
                .posts
                .as_ref()
                .unwrap_or_else(|| panic!("user {} was not merged", user.id));
            for post in posts {
                assert_eq!(post.user_id, user.id, "post {} under wrong user", post.id);
                for comment in post.comments.iter().flatten() {
                    assert_eq!(comment.post_id, post.id, "comment {} under wrong post", comment.id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_source_counts_calls() {
        let source = StubSource::default();
        let first = source.fetch_snapshot().await.expect("fetch should succeed");
        assert_eq!(first, fixtures::sample_snapshot());

        source.set_snapshot(SourceSnapshot::default()).await;
        let second = source.fetch_snapshot().await.expect("fetch should succeed");
        assert!(second.is_empty());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_source_returns_error() {
        let result = FailingSource::unavailable().fetch_snapshot().await;
        assertions::assert_fetch_error(&result);
    }

    #[test]
    fn test_sample_snapshot_merges_consistently() {
        let (merged, report) = roster_core::merge_snapshot(fixtures::sample_snapshot());
        assertions::assert_nesting_consistent(&merged);
        assert_eq!(report.orphan_posts, 1);
        assert_eq!(report.orphan_comments, 2);
    }
}
