//! Projection of incomplete tasks into oracle-safe ranking candidates.

use crate::task::domain::{EstimatedHours, Task, TaskId};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Defaulted projection of a task sent to the ranking oracle.
///
/// Candidates exist only for the duration of one ranking call and carry
/// nothing beyond what the oracle needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingCandidate {
    /// Identifier echoed back by the oracle.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Due date, defaulted when the task has none.
    pub due_date: NaiveDate,
    /// Time estimate in hours, defaulted when the task has none.
    pub estimated_completion_time: EstimatedHours,
}

/// Defaults injected for tasks missing a due date or estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePolicy {
    /// Days after today used as the due date of undated tasks.
    pub default_due_in_days: u32,
    /// Estimate used for tasks without one.
    pub default_estimated_hours: EstimatedHours,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            default_due_in_days: 7,
            default_estimated_hours: EstimatedHours::one_hour(),
        }
    }
}

impl CandidatePolicy {
    /// Returns the due date assigned to undated tasks relative to `today`.
    #[must_use]
    pub fn default_due_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.default_due_in_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Builds ranking candidates for every incomplete task, in snapshot order.
///
/// An empty result means there is nothing to rank and the oracle must not
/// be called.
#[must_use]
pub fn select_candidates(
    tasks: &[Task],
    today: NaiveDate,
    policy: &CandidatePolicy,
) -> Vec<RankingCandidate> {
    let default_due_date = policy.default_due_date(today);
    tasks
        .iter()
        .filter(|task| !task.is_completed())
        .map(|task| RankingCandidate {
            id: task.id().clone(),
            title: task.title().to_string(),
            due_date: task.due_date().unwrap_or(default_due_date),
            estimated_completion_time: task
                .estimated_completion_time()
                .cloned()
                .unwrap_or_else(|| policy.default_estimated_hours.clone()),
        })
        .collect()
}
