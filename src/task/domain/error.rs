//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty after trimming.
    #[error("task identifier must not be empty")]
    EmptyTaskId,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The estimated completion time is not a positive number of hours.
    #[error("invalid estimated completion time '{0}', expected a positive number of hours")]
    InvalidEstimatedHours(String),

    /// Priority ranks start at one.
    #[error("invalid priority {0}, expected a rank of at least 1")]
    InvalidPriority(u32),
}
