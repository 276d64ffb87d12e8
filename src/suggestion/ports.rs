//! Suggester port.

use super::domain::TaskDetailSuggestion;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for suggester calls.
pub type TaskDetailSuggesterResult<T> = Result<T, TaskDetailSuggesterError>;

/// External service that proposes labels and subtasks.
#[async_trait]
pub trait TaskDetailSuggester: Send + Sync {
    /// Suggests details for a task description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDetailSuggesterError`] when the service cannot be
    /// reached or its reply cannot be interpreted.
    async fn suggest(&self, description: &str) -> TaskDetailSuggesterResult<TaskDetailSuggestion>;
}

/// Errors returned by suggester implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskDetailSuggesterError {
    /// The service could not be reached or refused the request.
    #[error("suggestion service unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The service did not answer in time.
    #[error("suggestion service timed out after {0}s")]
    Timeout(u64),

    /// The reply did not match the expected shape.
    #[error("suggestion service returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl TaskDetailSuggesterError {
    /// Wraps a transport or runtime error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
