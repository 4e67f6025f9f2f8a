//! Upstream record types.
//!
//! Ids and foreign keys are typed; every other field is kept verbatim in an
//! opaque JSON map so records round-trip without loss.

use crate::ids::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque string-keyed JSON fields carried alongside the typed ones.
pub type Document = Map<String, Value>;

// ============================================================================
// USER
// ============================================================================

/// A user record, optionally nested with its posts after a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Present only on merged records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,

    /// Profile fields (`name`, `username`, `email`, `address`, ...).
    #[serde(flatten)]
    pub profile: Document,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            posts: None,
            profile: Document::new(),
        }
    }

    /// Builder-style profile field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = Some(posts);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.profile.get("name").and_then(Value::as_str)
    }

    /// Resolve a field by name or dotted path (`address.city`).
    ///
    /// `id` and `posts` resolve to the typed fields; anything else is looked
    /// up in the profile. Array elements are addressed by numeric segments.
    pub fn field_value(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let head = segments.next()?;

        let root = match head {
            "id" => Value::from(self.id.get()),
            "posts" => serde_json::to_value(self.posts.as_ref()?).ok()?,
            other => self.profile.get(other)?.clone(),
        };

        segments.try_fold(root, |value, segment| descend(&value, segment))
    }
}

fn descend(value: &Value, segment: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(segment).cloned(),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index).cloned()),
        _ => None,
    }
}

// ============================================================================
// POST
// ============================================================================

/// A post authored by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,

    #[serde(rename = "userId")]
    pub user_id: UserId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    /// Present only on merged records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,

    #[serde(flatten)]
    pub extra: Document,
}

impl Post {
    pub fn new(id: PostId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            title: String::new(),
            body: String::new(),
            comments: None,
            extra: Document::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

// ============================================================================
// COMMENT
// ============================================================================

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,

    #[serde(rename = "postId")]
    pub post_id: PostId,

    /// Content fields (`name`, `email`, `body`, ...).
    #[serde(flatten)]
    pub content: Document,
}

impl Comment {
    pub fn new(id: CommentId, post_id: PostId) -> Self {
        Self {
            id,
            post_id,
            content: Document::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// The three raw collections as fetched, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl SourceSnapshot {
    pub fn new(users: Vec<User>, posts: Vec<Post>, comments: Vec<Comment>) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.posts.is_empty() && self.comments.is_empty()
    }
}
