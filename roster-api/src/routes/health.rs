//! Health endpoints.
//!
//! `/health/ping` and `/health/live` only prove the process answers.
//! `/health/ready` counts users in the store and reports how the
//! single-user read cache is doing; it answers 503 when the store cannot
//! be read.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use roster_storage::{CacheStats, UserStore};
use serde::Serialize;

use crate::cached_store::CachedUserStore;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Ready,
    Degraded,
}

/// Body of `/health/ready`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub status: Readiness,
    pub store: StoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheReport>,
    pub version: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
    pub took_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Counters of the read-through cache since startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

impl CacheReport {
    fn new(stats: &CacheStats, ttl: Duration) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            entries: stats.entry_count,
            hit_rate: stats.hit_rate(),
            ttl_secs: ttl.as_secs(),
        }
    }
}

/// GET /health/ping
pub async fn ping() -> &'static str {
    "pong"
}

#[derive(Debug, Clone, Serialize)]
pub struct Liveness {
    pub alive: bool,
    pub version: &'static str,
}

/// GET /health/live
pub async fn liveness() -> Json<Liveness> {
    Json(Liveness { alive: true, version: env!("CARGO_PKG_VERSION") })
}

/// GET /health/ready
pub async fn readiness(
    State(store): State<Arc<dyn UserStore>>,
    State(cached_store): State<CachedUserStore>,
    State(started): State<Instant>,
) -> impl IntoResponse {
    let timer = Instant::now();
    let counted = store.count().await;
    let took_ms = timer.elapsed().as_millis() as u64;

    let (status, store_report) = match counted {
        Ok(count) => (
            Readiness::Ready,
            StoreReport { user_count: Some(count), took_ms, error: None },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store unreadable during readiness check");
            (
                Readiness::Degraded,
                StoreReport { user_count: None, took_ms, error: Some("Store check failed") },
            )
        }
    };

    let cache = cached_store.cache();
    let cache_report = match cache.stats().await {
        Ok(stats) => Some(CacheReport::new(&stats, cache.config().entry_ttl)),
        Err(e) => {
            tracing::warn!(error = %e, "Cache stats unavailable");
            None
        }
    };

    let report = ReadinessReport {
        status,
        store: store_report,
        cache: cache_report,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: started.elapsed().as_secs(),
    };

    let code = match status {
        Readiness::Ready => StatusCode::OK,
        Readiness::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(report))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}
