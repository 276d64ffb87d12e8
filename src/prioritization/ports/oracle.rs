//! Ranking oracle port.

use crate::prioritization::domain::RankingCandidate;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for ranking oracle calls.
pub type RankingOracleResult<T> = Result<T, RankingOracleError>;

/// External service that orders ranking candidates by urgency.
///
/// The oracle is untrusted: its reply may omit, repeat, or invent
/// identifiers, and callers must not rely on it being deterministic.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Returns candidate identifiers, most urgent first.
    ///
    /// # Errors
    ///
    /// Returns [`RankingOracleError`] when the oracle cannot be reached or
    /// its reply cannot be interpreted.
    async fn rank(&self, candidates: &[RankingCandidate]) -> RankingOracleResult<Vec<TaskId>>;
}

/// Errors returned by ranking oracle implementations.
#[derive(Debug, Clone, Error)]
pub enum RankingOracleError {
    /// The oracle could not be reached or refused the request.
    #[error("ranking oracle unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The oracle did not answer in time.
    #[error("ranking oracle timed out after {}ms", after.as_millis())]
    Timeout {
        /// Time waited before giving up.
        after: Duration,
    },

    /// The reply did not match the expected shape.
    #[error("ranking oracle returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl RankingOracleError {
    /// Wraps a transport or runtime error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
