//! Request and response bodies for the REST API.
//!
//! Field names are camelCase on the wire to match the records served by
//! the upstream source.

use roster_core::{ListQuery, Page, User};
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// Query string of `GET /users/users`.
///
/// Values stay raw strings so malformed input falls back to defaults
/// instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListUsersParams {
    pub fn to_query(&self) -> ListQuery {
        ListQuery::from_params(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.sort_by.as_deref(),
            self.order.as_deref(),
        )
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub total_users: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub users: Vec<User>,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        Self {
            total_users: page.total,
            current_page: page.current_page,
            total_pages: page.total_pages,
            users: page.items,
        }
    }
}

/// Single-user read, tagged with whether it came from the read cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReadResponse {
    pub from_cache: bool,
    pub data: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
