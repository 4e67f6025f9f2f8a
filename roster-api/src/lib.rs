//! ROSTER API - REST layer
//!
//! Serves the mirrored user collection over HTTP: a reload endpoint that
//! runs the fetch/merge/replace pipeline, CRUD and paginated listing, and a
//! single-user read path backed by a short-lived read-through cache.

pub mod cached_store;
pub mod config;
pub mod error;
pub mod macros;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use cached_store::{CachedUserStore, UserCache};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::{create_api_router, create_api_service, ApiService};
pub use services::load_users;
pub use state::AppState;
pub use types::*;
