//! Load pipeline: fetch the upstream snapshot, merge it, replace the store.

use roster_core::{merge_snapshot, MergeReport, RosterResult};
use roster_source::DataSource;
use roster_storage::UserStore;
use tracing::{info, warn};

/// Fetch, merge and persist the upstream data.
///
/// Nothing is written unless the fetch succeeds; the store swap itself is
/// atomic, so a failed load leaves the previous collection in place.
#[tracing::instrument(skip_all)]
pub async fn load_users(
    source: &dyn DataSource,
    store: &dyn UserStore,
) -> RosterResult<MergeReport> {
    let snapshot = source.fetch_snapshot().await?;
    let (users, report) = merge_snapshot(snapshot);

    if report.orphan_posts > 0 || report.orphan_comments > 0 {
        warn!(
            orphan_posts = report.orphan_posts,
            orphan_comments = report.orphan_comments,
            "Dropping records without a parent"
        );
    }

    store.replace_all(users).await?;

    info!(
        users = report.users,
        posts = report.posts_attached,
        comments = report.comments_attached,
        "Users loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roster_core::{ListQuery, SortOrder, UserId};
    use roster_storage::InMemoryUserStore;
    use roster_test_utils::{
        assertions::{assert_fetch_error, assert_nesting_consistent},
        fixtures::{sample_snapshot, user},
        generators::arb_snapshot,
        FailingSource, StubSource,
    };

    #[tokio::test]
    async fn test_load_replaces_store_with_merged_users() {
        let store = InMemoryUserStore::with_users(vec![user(42, "stale")])
            .expect("store should build");
        let source = StubSource::default();

        let report = load_users(&source, &store).await.expect("load should succeed");

        assert_eq!(report.users, 3);
        assert_eq!(report.posts_attached, 3);
        assert_eq!(report.comments_attached, 3);
        assert_eq!(store.count().await.expect("count"), 3);
        assert!(store.find_by_id(UserId::new(42)).await.expect("find").is_none());

        let leanne = store
            .find_by_id(UserId::new(1))
            .await
            .expect("find should succeed")
            .expect("user 1 should exist");
        assert_nesting_consistent(std::slice::from_ref(&leanne));
        let posts = leanne.posts.expect("posts should be attached");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].comments.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_data() {
        let store = InMemoryUserStore::with_users(vec![user(7, "kept")])
            .expect("store should build");

        let result = load_users(&FailingSource::unavailable(), &store).await;

        assert_fetch_error(&result);
        assert_eq!(store.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let store = InMemoryUserStore::new();
        let source = StubSource::new(sample_snapshot());

        let first = load_users(&source, &store).await.expect("first load");
        let second = load_users(&source, &store).await.expect("second load");

        assert_eq!(first, second);
        assert_eq!(store.count().await.expect("count"), 3);
        assert_eq!(source.calls(), 2);
    }

    proptest! {
        #[test]
        fn prop_loaded_users_keep_nesting(snapshot in arb_snapshot()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime should build");
            let expected_users = snapshot.users.len() as u64;
            let source = StubSource::new(snapshot);
            let store = InMemoryUserStore::new();
            let query = ListQuery::default()
                .with_limit(100)
                .sorted_by("id", SortOrder::Ascending);

            let (report, page) = runtime
                .block_on(async {
                    let report = load_users(&source, &store).await?;
                    let page = store.list(&query).await?;
                    Ok::<_, roster_core::RosterError>((report, page))
                })
                .expect("load should succeed");

            prop_assert_eq!(report.users as u64, expected_users);
            prop_assert_eq!(page.total, expected_users);
            assert_nesting_consistent(&page.items);
        }
    }
}
