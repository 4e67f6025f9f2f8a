//! Error Types for ROSTER API
//!
//! This module defines error handling for the HTTP layer:
//! - ApiError struct carrying a code and a client-safe message
//! - ErrorCode enum mapping each category to an HTTP status
//! - IntoResponse implementation rendering `{"error": "<message>"}`
//!
//! Internal details are logged, never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{RosterError, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ErrorBody;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400, 404)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    /// Requested user does not exist
    UserNotFound,

    /// No route matches the request path
    RouteNotFound,

    /// A user with the same id already exists
    UserAlreadyExists,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Upstream source could not be fetched
    UpstreamFetchFailed,

    /// Store operation failed
    DatabaseError,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Conflicts are reported as plain bad requests.
            ErrorCode::InvalidInput | ErrorCode::UserAlreadyExists => StatusCode::BAD_REQUEST,

            ErrorCode::UserNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::UpstreamFetchFailed
            | ErrorCode::DatabaseError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data.",
            ErrorCode::UserNotFound => "User not found.",
            ErrorCode::RouteNotFound => "Route not found.",
            ErrorCode::UserAlreadyExists => "User already exists.",
            ErrorCode::UpstreamFetchFailed => "Failed to fetch upstream data.",
            ErrorCode::DatabaseError => "Database operation failed.",
            ErrorCode::InternalError => "Internal server error.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable, client-safe message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn user_not_found() -> Self {
        Self::from_code(ErrorCode::UserNotFound)
    }

    pub fn route_not_found() -> Self {
        Self::from_code(ErrorCode::RouteNotFound)
    }

    pub fn user_already_exists() -> Self {
        Self::from_code(ErrorCode::UserAlreadyExists)
    }

    pub fn upstream_fetch_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFetchFailed, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Map a domain error at a handler boundary.
    ///
    /// `NotFound` and `AlreadyExists` keep their own messages; every other
    /// failure is logged in full and reported with `context` only.
    pub fn from_roster(err: RosterError, context: &str) -> Self {
        match &err {
            RosterError::Storage(StorageError::NotFound { .. }) => Self::user_not_found(),
            RosterError::Storage(StorageError::AlreadyExists { .. }) => {
                Self::user_already_exists()
            }
            RosterError::Fetch(_) => {
                tracing::error!(error = %err, "{}", context);
                Self::upstream_fetch_failed(context)
            }
            RosterError::Storage(_) => {
                tracing::error!(error = %err, "{}", context);
                Self::database_error(context)
            }
            RosterError::Config(_) => {
                tracing::error!(error = %err, "{}", context);
                Self::internal_error(context)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.message,
        });
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Convert from RosterError with the code's default message.
impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        let context = match &err {
            RosterError::Fetch(_) => ErrorCode::UpstreamFetchFailed.default_message(),
            RosterError::Storage(_) => ErrorCode::DatabaseError.default_message(),
            RosterError::Config(_) => ErrorCode::InternalError.default_message(),
        };
        Self::from_roster(err, context)
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
