//! Merge engine: nests comments under posts and posts under users.
//!
//! The join is pre-indexed. Comments are grouped by `postId` and posts by
//! `userId`, keeping first-seen order inside each group, then every user
//! picks up its group. Posts whose user is missing and comments whose post
//! is missing (or orphaned) are dropped without error.

use crate::ids::{PostId, UserId};
use crate::types::{Comment, Post, SourceSnapshot, User};
use std::collections::{HashMap, HashSet};

/// Counts describing one merge run, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub users: usize,
    pub posts_attached: usize,
    pub comments_attached: usize,
    pub orphan_posts: usize,
    pub orphan_comments: usize,
}

/// Attach posts (with their comments) to users.
///
/// Output order is user input order; each `posts` and `comments` list
/// follows input order. Every returned user has `posts: Some(..)`, empty
/// when the user authored nothing.
pub fn merge_users(users: Vec<User>, posts: Vec<Post>, comments: Vec<Comment>) -> Vec<User> {
    merge_snapshot(SourceSnapshot::new(users, posts, comments)).0
}

/// Merge a fetched snapshot and report how many records were attached.
pub fn merge_snapshot(snapshot: SourceSnapshot) -> (Vec<User>, MergeReport) {
    let SourceSnapshot {
        users,
        posts,
        comments,
    } = snapshot;

    let mut comments_by_post: HashMap<PostId, Vec<Comment>> = HashMap::new();
    for comment in comments {
        comments_by_post
            .entry(comment.post_id)
            .or_default()
            .push(comment);
    }

    let mut posts_by_user: HashMap<UserId, Vec<Post>> = HashMap::new();
    for post in posts {
        posts_by_user.entry(post.user_id).or_default().push(post);
    }

    let present: HashSet<UserId> = users.iter().map(|user| user.id).collect();
    let reachable_posts: HashSet<PostId> = posts_by_user
        .iter()
        .filter(|(user_id, _)| present.contains(user_id))
        .flat_map(|(_, group)| group.iter().map(|post| post.id))
        .collect();

    let mut report = MergeReport {
        users: users.len(),
        orphan_posts: posts_by_user
            .iter()
            .filter(|(user_id, _)| !present.contains(user_id))
            .map(|(_, group)| group.len())
            .sum(),
        orphan_comments: comments_by_post
            .iter()
            .filter(|(post_id, _)| !reachable_posts.contains(post_id))
            .map(|(_, group)| group.len())
            .sum(),
        ..MergeReport::default()
    };

    let merged = users
        .into_iter()
        .map(|mut user| {
            let authored: Vec<Post> = posts_by_user
                .get(&user.id)
                .map(|group| {
                    group
                        .iter()
                        .map(|post| {
                            let mut post = post.clone();
                            let thread = comments_by_post.get(&post.id).cloned().unwrap_or_default();
                            report.comments_attached += thread.len();
                            post.comments = Some(thread);
                            post
                        })
                        .collect()
                })
                .unwrap_or_default();

            report.posts_attached += authored.len();
            user.posts = Some(authored);
            user
        })
        .collect();

    (merged, report)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CommentId;

    fn user(id: i64) -> User {
        User::new(UserId::new(id)).with_field("name", format!("user-{id}"))
    }

    fn post(id: i64, user_id: i64) -> Post {
        Post::new(PostId::new(id), UserId::new(user_id)).with_title(format!("post-{id}"))
    }

    fn comment(id: i64, post_id: i64) -> Comment {
        Comment::new(CommentId::new(id), PostId::new(post_id))
    }

    fn post_ids(user: &User) -> Vec<i64> {
        user.posts
            .iter()
            .flatten()
            .map(|post| post.id.get())
            .collect()
    }

    #[test]
    fn test_merge_nests_and_drops_orphans() {
        let users = vec![user(1), user(2)];
        let posts = vec![post(10, 1), post(11, 1), post(12, 3)];
        let comments = vec![comment(100, 10), comment(101, 12)];

        let merged = merge_users(users, posts, comments);

        assert_eq!(merged.len(), 2);
        assert_eq!(post_ids(&merged[0]), vec![10, 11]);
        assert_eq!(merged[1].posts, Some(vec![]));

        let first_posts = merged[0].posts.as_deref().unwrap_or_default();
        let thread: Vec<i64> = first_posts[0]
            .comments
            .iter()
            .flatten()
            .map(|c| c.id.get())
            .collect();
        assert_eq!(thread, vec![100]);
        assert_eq!(first_posts[1].comments, Some(vec![]));
    }

    #[test]
    fn test_merge_report_counts_orphans() {
        let snapshot = SourceSnapshot::new(
            vec![user(1), user(2)],
            vec![post(10, 1), post(11, 1), post(12, 3)],
            vec![comment(100, 10), comment(101, 12), comment(102, 99)],
        );

        let (_, report) = merge_snapshot(snapshot);

        assert_eq!(
            report,
            MergeReport {
                users: 2,
                posts_attached: 2,
                comments_attached: 1,
                orphan_posts: 1,
                orphan_comments: 2,
            }
        );
    }

    #[test]
    fn test_merge_preserves_source_order() {
        let users = vec![user(5), user(1), user(3)];
        let posts = vec![post(30, 1), post(10, 1), post(20, 1)];
        let comments = vec![comment(3, 10), comment(1, 10), comment(2, 10)];

        let merged = merge_users(users, posts, comments);

        let order: Vec<i64> = merged.iter().map(|u| u.id.get()).collect();
        assert_eq!(order, vec![5, 1, 3]);
        assert_eq!(post_ids(&merged[1]), vec![30, 10, 20]);

        let thread: Vec<i64> = merged[1]
            .posts
            .iter()
            .flatten()
            .filter(|p| p.id == PostId::new(10))
            .flat_map(|p| p.comments.iter().flatten())
            .map(|c| c.id.get())
            .collect();
        assert_eq!(thread, vec![3, 1, 2]);
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_users(vec![], vec![post(1, 1)], vec![comment(1, 1)]).is_empty());
    }

    #[test]
    fn test_merge_is_deterministic() -> Result<(), String> {
        let build = || {
            merge_users(
                vec![user(1), user(2)],
                vec![post(10, 2), post(11, 1), post(12, 2)],
                vec![comment(100, 12), comment(101, 10), comment(102, 12)],
            )
        };

        let a = serde_json::to_string(&build()).map_err(|e| e.to_string())?;
        let b = serde_json::to_string(&build()).map_err(|e| e.to_string())?;
        assert_eq!(a, b);
        Ok(())
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::ids::CommentId;
    use proptest::prelude::*;

    fn arb_snapshot() -> impl Strategy<Value = SourceSnapshot> {
        (
            prop::collection::btree_set(0i64..8, 0..6),
            prop::collection::btree_map(0i64..40, 0i64..10, 0..20),
            prop::collection::vec((0i64..200, 0i64..45), 0..40),
        )
            .prop_map(|(user_ids, posts, comments)| {
                SourceSnapshot::new(
                    user_ids
                        .into_iter()
                        .map(|id| User::new(UserId::new(id)))
                        .collect(),
                    posts
                        .into_iter()
                        .map(|(id, user_id)| Post::new(PostId::new(id), UserId::new(user_id)))
                        .collect(),
                    comments
                        .into_iter()
                        .map(|(id, post_id)| Comment::new(CommentId::new(id), PostId::new(post_id)))
                        .collect(),
                )
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Every user carries exactly the posts that reference it, in order,
        /// and every post carries exactly the comments that reference it.
        #[test]
        fn prop_join_matches_foreign_keys(snapshot in arb_snapshot()) {
            let source = snapshot.clone();
            let (merged, _) = merge_snapshot(snapshot);

            prop_assert_eq!(merged.len(), source.users.len());

            for (user, original) in merged.iter().zip(source.users.iter()) {
                prop_assert_eq!(user.id, original.id);

                let expected_posts: Vec<PostId> = source
                    .posts
                    .iter()
                    .filter(|p| p.user_id == user.id)
                    .map(|p| p.id)
                    .collect();
                let posts = user.posts.clone().unwrap_or_default();
                let actual_posts: Vec<PostId> = posts.iter().map(|p| p.id).collect();
                prop_assert_eq!(actual_posts, expected_posts);

                for post in &posts {
                    prop_assert_eq!(post.user_id, user.id);
                    let expected_comments: Vec<CommentId> = source
                        .comments
                        .iter()
                        .filter(|c| c.post_id == post.id)
                        .map(|c| c.id)
                        .collect();
                    let actual_comments: Vec<CommentId> = post
                        .comments
                        .iter()
                        .flatten()
                        .map(|c| c.id)
                        .collect();
                    prop_assert_eq!(actual_comments, expected_comments);
                }
            }
        }

        #[test]
        fn prop_report_balances(snapshot in arb_snapshot()) {
            let posts = snapshot.posts.len();
            let comments = snapshot.comments.len();
            let (_, report) = merge_snapshot(snapshot);
            prop_assert_eq!(report.posts_attached + report.orphan_posts, posts);
            prop_assert_eq!(report.comments_attached + report.orphan_comments, comments);
        }
    }
}
