//! User REST API Routes
//!
//! Mounted under `/users`:
//! - `GET    /users/load`     reload from the upstream source
//! - `GET    /users/users`    paginated, sorted listing
//! - `GET    /users/:userId`  single user through the read cache
//! - `POST   /users`          create a user
//! - `DELETE /users`          delete every user
//! - `DELETE /users/:userId`  delete one user
//!
//! Every handler maps failures at its own boundary: a missing user is a
//! 404, a duplicate id a 400, and anything else a 500 carrying the
//! handler's generic message.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use roster_core::{User, UserId};
use roster_source::DataSource;
use roster_storage::UserStore;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    cached_store::CachedUserStore,
    error::{ApiError, ApiResult},
    services::load_users,
    state::AppState,
    types::{ListUsersParams, MessageResponse, UserListResponse, UserReadResponse},
};

const LOAD_FAILED: &str = "Failed to load users.";
const LIST_FAILED: &str = "Failed to fetch users.";
const GET_FAILED: &str = "Failed to get user.";
const CREATE_FAILED: &str = "Failed to add user.";
const DELETE_ALL_FAILED: &str = "Failed to delete users.";
const DELETE_ONE_FAILED: &str = "Failed to delete user.";
const INVALID_USER: &str = "Invalid user.";

/// Path segments that are not a number name no stored user.
fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    UserId::parse_lenient(raw).ok_or_else(ApiError::user_not_found)
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /users/load - Fetch, merge and replace the stored users
pub async fn load(
    State(source): State<Arc<dyn DataSource>>,
    State(store): State<Arc<dyn UserStore>>,
) -> ApiResult<StatusCode> {
    load_users(source.as_ref(), store.as_ref())
        .await
        .map_err(|e| ApiError::from_roster(e, LOAD_FAILED))?;

    Ok(StatusCode::OK)
}

/// GET /users/users - List users with pagination and sorting
pub async fn list_users(
    State(store): State<Arc<dyn UserStore>>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<impl IntoResponse> {
    let query = params.to_query();
    debug!(?query, "Listing users");

    let page = store
        .list(&query)
        .await
        .map_err(|e| ApiError::from_roster(e, LIST_FAILED))?;

    Ok(Json(UserListResponse::from(page)))
}

/// GET /users/:userId - Get one user, preferring the read cache
pub async fn get_user(
    State(cached_store): State<CachedUserStore>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_user_id(&raw_id)?;

    let read = cached_store
        .user_get(id)
        .await
        .map_err(|e| ApiError::from_roster(e, GET_FAILED))?
        .ok_or_else(ApiError::user_not_found)?;

    debug!(
        user_id = %id,
        from_cache = read.was_cache_hit(),
        age_ms = read.age().as_millis() as u64,
        "User read"
    );

    Ok(Json(UserReadResponse {
        from_cache: read.was_cache_hit(),
        data: read.into_value(),
    }))
}

/// POST /users - Create a user
pub async fn create_user(
    State(store): State<Arc<dyn UserStore>>,
    payload: Result<Json<User>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(user) = payload.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Rejected user payload");
        ApiError::invalid_input(INVALID_USER)
    })?;

    let created = store
        .insert(user)
        .await
        .map_err(|e| ApiError::from_roster(e, CREATE_FAILED))?;

    info!(user_id = %created.id, "User created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /users - Delete every user
pub async fn delete_all_users(
    State(store): State<Arc<dyn UserStore>>,
) -> ApiResult<impl IntoResponse> {
    let removed = store
        .delete_all()
        .await
        .map_err(|e| ApiError::from_roster(e, DELETE_ALL_FAILED))?;

    info!(removed, "All users deleted");
    Ok(Json(MessageResponse::new("All users deleted successfully.")))
}

/// DELETE /users/:userId - Delete one user
pub async fn delete_user(
    State(store): State<Arc<dyn UserStore>>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_user_id(&raw_id)?;

    let removed = store
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::from_roster(e, DELETE_ONE_FAILED))?;

    if removed == 0 {
        return Err(ApiError::user_not_found());
    }

    info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully.")))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the user router. Static segments win over `/:user_id`.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).delete(delete_all_users))
        .route("/load", get(load))
        .route("/users", get(list_users))
        .route("/:user_id", get(get_user).delete(delete_user))
}
