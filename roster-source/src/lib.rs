//! ROSTER Source - Upstream Data Fetcher
//!
//! Retrieves the raw users, posts and comments collections from the
//! upstream JSON service. A load either gets all three or fails as a whole.

pub mod config;
pub mod http;

use async_trait::async_trait;
use roster_core::{RosterResult, SourceSnapshot};

pub use config::{SourceConfig, DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS};
pub use http::HttpSource;

/// Provider of raw upstream collections.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch all three collections, in source order.
    ///
    /// Never returns a partial snapshot: any failing collection fails the call.
    async fn fetch_snapshot(&self) -> RosterResult<SourceSnapshot>;
}
