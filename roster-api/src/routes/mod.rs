//! REST API Routes
//!
//! Assembles the user and health routers, request tracing and CORS into the
//! application router. The served service also trims a trailing slash
//! before routing, so `/users/` reaches the same handler as `/users`.

pub mod health;
pub mod user;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

pub use health::create_router as health_router;
pub use user::create_router as user_router;

/// GET / - Greeting
async fn root() -> &'static str {
    "Hello from the ROSTER user service!"
}

/// Unmatched paths answer with the JSON error body.
async fn not_found() -> ApiError {
    ApiError::route_not_found()
}

/// The service handed to the server.
pub type ApiService = NormalizePath<Router>;

/// Build the full application router over `state`.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/users", user::create_router())
        .nest("/health", health::create_router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// Wrap the router so trailing slashes are trimmed before routing.
pub fn create_api_service(state: AppState, config: &ApiConfig) -> ApiService {
    NormalizePath::trim_trailing_slash(create_api_router(state, config))
}

/// Build the CORS layer.
///
/// With no configured origins any origin is allowed; otherwise only the
/// listed ones. Origins that are not valid header values are skipped.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if !config.is_production() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
        .allow_credentials(config.cors_allow_credentials)
}
