//! Error types for ROSTER operations

use crate::ids::UserId;
use thiserror::Error;

/// Store gateway errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("User not found: {id}")]
    NotFound { id: UserId },

    #[error("User with id {id} already exists")]
    AlreadyExists { id: UserId },

    #[error("Storage backend failed during {operation}: {reason}")]
    Backend {
        operation: &'static str,
        reason: String,
    },

    #[error("Document serialization failed: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Upstream fetch errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request for {resource} failed: {reason}")]
    Request { resource: String, reason: String },

    #[error("Request for {resource} returned status {status}")]
    Status { resource: String, status: u16 },

    #[error("Response for {resource} could not be decoded: {reason}")]
    Decode { resource: String, reason: String },

    #[error("Request for {resource} timed out")]
    Timeout { resource: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all ROSTER errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl RosterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::Storage(StorageError::NotFound { .. }))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RosterError::Storage(StorageError::AlreadyExists { .. }))
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Storage(err.into())
    }
}

/// Result type alias for ROSTER operations.
pub type RosterResult<T> = Result<T, RosterError>;

// =============================================================================
// TESTS
// =============================================================================
