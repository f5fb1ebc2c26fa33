// ABOUTME: Application error types for the Aula course platform engine
// ABOUTME: Typed failures surfaced to callers - never silently swallowed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error kinds
///
/// Every fallible operation in the engine returns one of these. The engine
/// performs no retries itself; upserts are idempotent and safe to resubmit.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced course/chapter/progress row is absent
    #[error("{0} not found")]
    NotFound(String),

    /// Caller lacks ownership of the resource (e.g. not the authoring instructor)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Reorder input is not an exact permutation of the course's chapter ids
    #[error("Invalid ordering: {0}")]
    InvalidOrdering(String),

    /// Publish attempt failed field-completeness checks
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Optimistic-concurrency failure on a transactional write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A missing resource, named for the caller
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// An ownership/authorization failure
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// A reorder precondition violation
    pub fn invalid_ordering(msg: impl Into<String>) -> Self {
        Self::InvalidOrdering(msg.into())
    }

    /// A publish validation failure naming the missing field(s)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// A concurrent-modification conflict
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// A malformed-input failure
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// A database failure
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// An unexpected internal failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<uuid::Error> for AppError {
    fn from(e: uuid::Error) -> Self {
        Self::Internal(format!("Invalid UUID: {e}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {e}"))
    }
}
