//! Scripted in-memory ranking oracle for tests.

use crate::prioritization::{
    domain::RankingCandidate,
    ports::{RankingOracle, RankingOracleError, RankingOracleResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Oracle that replays queued replies and records every request.
///
/// When the queue is empty the oracle echoes the candidates in input order.
/// An optional delay is applied before each reply, which lets callers
/// exercise timeouts.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRankingOracle {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    replies: VecDeque<RankingOracleResult<Vec<TaskId>>>,
    requests: Vec<Vec<RankingCandidate>>,
    delay: Option<Duration>,
}

impl ScriptedRankingOracle {
    /// Creates an oracle with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful ordering.
    pub fn push_ranking(&self, ids: impl IntoIterator<Item = TaskId>) {
        self.lock().replies.push_back(Ok(ids.into_iter().collect()));
    }

    /// Queues a failure.
    pub fn push_failure(&self, error: RankingOracleError) {
        self.lock().replies.push_back(Err(error));
    }

    /// Delays every subsequent reply by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    /// Returns the candidate lists received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<RankingCandidate>> {
        self.lock().requests.clone()
    }

    /// Returns the number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RankingOracle for ScriptedRankingOracle {
    async fn rank(&self, candidates: &[RankingCandidate]) -> RankingOracleResult<Vec<TaskId>> {
        let (reply, delay) = {
            let mut state = self.lock();
            state.requests.push(candidates.to_vec());
            (state.replies.pop_front(), state.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        reply.unwrap_or_else(|| Ok(candidates.iter().map(|candidate| candidate.id.clone()).collect()))
    }
}
