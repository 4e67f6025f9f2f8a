//! ROSTER Core - Domain Types
//!
//! Users, posts and comments as served by the upstream source, the merge
//! engine that nests them, and the list query/pagination model shared by
//! every store backend. All other crates depend on this.

pub mod error;
pub mod ids;
pub mod merge;
pub mod query;
pub mod types;

pub use error::{ConfigError, FetchError, RosterError, RosterResult, StorageError};
pub use ids::{parse_leading_int, CommentId, PostId, UserId};
pub use merge::{merge_snapshot, merge_users, MergeReport};
pub use query::{
    compare_values, paginate, ListQuery, Page, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE,
    DEFAULT_SORT_FIELD,
};
pub use types::{Comment, Document, Post, SourceSnapshot, User};
