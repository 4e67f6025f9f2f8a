//! HTTP fetcher for the upstream JSON service.

use async_trait::async_trait;
use roster_core::{Comment, ConfigError, FetchError, Post, RosterResult, SourceSnapshot, User};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::DataSource;

/// Fetches `users`, `posts` and `comments` concurrently over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl HttpSource {
    /// Build a source with a client bounded by `config.timeout`.
    pub fn new(config: SourceConfig) -> RosterResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("roster/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "http_client".to_string(),
                value: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        resource: &'static str,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.config.resource_url(resource);
        debug!(%url, "Fetching upstream collection");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let items: Vec<T> = response.json().await.map_err(|e| classify(resource, e))?;
        debug!(resource, count = items.len(), "Fetched upstream collection");
        Ok(items)
    }
}

/// Map a client error onto the fetch failure it represents.
fn classify(resource: &str, err: reqwest::Error) -> FetchError {
    let resource = resource.to_string();
    if err.is_timeout() {
        FetchError::Timeout { resource }
    } else if err.is_decode() {
        FetchError::Decode {
            resource,
            reason: err.to_string(),
        }
    } else {
        FetchError::Request {
            resource,
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_snapshot(&self) -> RosterResult<SourceSnapshot> {
        let (users, posts, comments) = tokio::try_join!(
            self.fetch_collection::<User>("users"),
            self.fetch_collection::<Post>("posts"),
            self.fetch_collection::<Comment>("comments"),
        )?;

        let snapshot = SourceSnapshot::new(users, posts, comments);
        info!(
            users = snapshot.users.len(),
            posts = snapshot.posts.len(),
            comments = snapshot.comments.len(),
            "Fetched upstream snapshot"
        );
        Ok(snapshot)
    }
}

// =============================================================================
// TESTS
// =============================================================================
