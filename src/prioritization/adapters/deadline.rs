//! Local, deterministic ranking by due date and effort.

use crate::prioritization::{
    domain::RankingCandidate,
    ports::{RankingOracle, RankingOracleResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;

/// Oracle that ranks earlier due dates first and, on the same day, longer
/// estimates first.
///
/// Candidates that tie on both keep their input order. Useful offline and
/// as a reference ordering in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineRankingOracle;

impl DeadlineRankingOracle {
    /// Creates the oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Orders candidates without going through the async port.
    #[must_use]
    pub fn order(candidates: &[RankingCandidate]) -> Vec<TaskId> {
        let mut ordered: Vec<&RankingCandidate> = candidates.iter().collect();
        ordered.sort_by(|left, right| {
            left.due_date.cmp(&right.due_date).then_with(|| {
                right
                    .estimated_completion_time
                    .hours()
                    .total_cmp(&left.estimated_completion_time.hours())
            })
        });
        ordered.into_iter().map(|candidate| candidate.id.clone()).collect()
    }
}

#[async_trait]
impl RankingOracle for DeadlineRankingOracle {
    async fn rank(&self, candidates: &[RankingCandidate]) -> RankingOracleResult<Vec<TaskId>> {
        Ok(Self::order(candidates))
    }
}
