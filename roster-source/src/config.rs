//! Upstream source configuration.

use std::time::Duration;

/// Public jsonplaceholder instance.
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL; collections are fetched from `{base_url}/{resource}`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SourceConfig {
    /// Create configuration from `ROSTER_SOURCE_URL` and
    /// `ROSTER_SOURCE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ROSTER_SOURCE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("ROSTER_SOURCE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of one upstream collection.
    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), resource)
    }
}
