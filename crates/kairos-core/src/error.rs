//! Core error types for kairos-core.
//!
//! This module defines the error hierarchy using thiserror. Malformed input
//! records are rejected up front with a [`ValidationError`]; the search loop
//! itself never signals errors (see the optimizer module for its silent
//! degradation rules).

use thiserror::Error;

/// Core error type for kairos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors raised before any optimization runs.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A task field violates its documented range
    #[error("Invalid value for '{field}' on task '{task_id}': {message}")]
    InvalidTaskField {
        task_id: String,
        field: String,
        message: String,
    },

    /// Two tasks share the same identifier
    #[error("Duplicate task id: {0}")]
    DuplicateTaskId(String),

    /// A dependency references a task id not present in the input
    #[error("Task '{task_id}' depends on unknown task '{dependency}'")]
    UnknownDependency { task_id: String, dependency: String },

    /// A time slot has no usable duration
    #[error("Invalid time slot starting at {start}: duration must be positive")]
    InvalidSlotDuration { start: chrono::DateTime<chrono::Utc> },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
