//! End-to-end re-prioritization run.
//!
//! A run reads the snapshot, asks the oracle to rank the incomplete tasks,
//! and writes the merged priorities back. Oracle failures leave the stored
//! snapshot untouched. Only one run may be in flight per service; a second
//! call while one is pending is rejected rather than queued.

use crate::prioritization::{
    domain::{
        CandidatePolicy, MergeReport, RankingCandidate, merge_priorities, select_candidates,
    },
    ports::{RankingOracle, RankingOracleError},
};
use crate::task::{
    domain::{SnapshotRevision, Task, TaskId, sort_for_display},
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Default time allowed for one oracle call.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for a re-prioritization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritizationSettings {
    /// Defaults injected into ranking candidates.
    pub policy: CandidatePolicy,
    /// Time allowed for one oracle call before it counts as failed.
    pub oracle_timeout: Duration,
}

impl Default for PrioritizationSettings {
    fn default() -> Self {
        Self {
            policy: CandidatePolicy::default(),
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }
}

/// Why a run finished without calling the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingToPrioritize {
    /// The snapshot holds no tasks.
    NoTasks,
    /// Every task is completed.
    AllTasksCompleted,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritizationSummary {
    /// Revision written by the run.
    pub revision: SnapshotRevision,
    /// All tasks in display order.
    pub tasks: Vec<Task>,
    /// What the merge changed.
    pub report: MergeReport,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrioritizationOutcome {
    /// Nothing was ranked and nothing was written.
    NothingToPrioritize(NothingToPrioritize),
    /// Priorities were merged and saved.
    Prioritized(PrioritizationSummary),
}

/// Service-level errors for re-prioritization.
#[derive(Debug, Error)]
pub enum PrioritizationError {
    /// Another run is still in flight.
    #[error("a prioritization run is already in progress")]
    AlreadyInProgress,
    /// The oracle failed; the snapshot was left untouched.
    #[error("prioritization failed: {0}")]
    PrioritizationFailed(#[source] RankingOracleError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

impl PrioritizationError {
    /// Returns `true` when retrying later may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInProgress
                | Self::PrioritizationFailed(_)
                | Self::Store(TaskStoreError::RevisionConflict { .. })
        )
    }
}

/// Result type for re-prioritization.
pub type PrioritizationResult<T> = Result<T, PrioritizationError>;

/// Re-prioritization orchestration service.
#[derive(Clone)]
pub struct PrioritizationService<S, O, C>
where
    S: TaskStore,
    O: RankingOracle,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    oracle: Arc<O>,
    clock: Arc<C>,
    settings: PrioritizationSettings,
    in_flight: Arc<Mutex<()>>,
}

impl<S, O, C> PrioritizationService<S, O, C>
where
    S: TaskStore,
    O: RankingOracle,
    C: Clock + Send + Sync,
{
    /// Creates a service with default settings.
    #[must_use]
    pub fn new(store: Arc<S>, oracle: Arc<O>, clock: Arc<C>) -> Self {
        Self::with_settings(store, oracle, clock, PrioritizationSettings::default())
    }

    /// Creates a service with explicit settings.
    #[must_use]
    pub fn with_settings(
        store: Arc<S>,
        oracle: Arc<O>,
        clock: Arc<C>,
        settings: PrioritizationSettings,
    ) -> Self {
        Self {
            store,
            oracle,
            clock,
            settings,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &PrioritizationSettings {
        &self.settings
    }

    /// Re-orders all incomplete tasks using the oracle.
    ///
    /// The merge runs against the snapshot as it is after the oracle
    /// answers, so tasks deleted in the meantime are never re-introduced
    /// and tasks completed in the meantime end up unranked. Dropping the
    /// returned future before it resolves writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PrioritizationError::AlreadyInProgress`] when another run
    /// is pending, [`PrioritizationError::PrioritizationFailed`] when the
    /// oracle fails or exceeds the timeout, and store errors otherwise.
    pub async fn prioritize(&self) -> PrioritizationResult<PrioritizationOutcome> {
        let Ok(_running) = self.in_flight.try_lock() else {
            tracing::warn!("prioritization requested while another run is in flight");
            return Err(PrioritizationError::AlreadyInProgress);
        };

        let snapshot = self.store.load().await?;
        if snapshot.is_empty() {
            tracing::info!("no tasks to prioritize");
            return Ok(PrioritizationOutcome::NothingToPrioritize(
                NothingToPrioritize::NoTasks,
            ));
        }

        let today = self.clock.local().date_naive();
        let candidates = select_candidates(snapshot.tasks(), today, &self.settings.policy);
        if candidates.is_empty() {
            tracing::info!("all tasks completed; nothing to prioritize");
            return Ok(PrioritizationOutcome::NothingToPrioritize(
                NothingToPrioritize::AllTasksCompleted,
            ));
        }

        tracing::debug!(candidates = candidates.len(), "requesting ranking");
        let ranked = self.request_ranking(&candidates).await.map_err(|err| {
            tracing::warn!(error = %err, "ranking oracle failed; snapshot left unchanged");
            PrioritizationError::PrioritizationFailed(err)
        })?;

        let current = self.store.load().await?;
        if current.revision() != snapshot.revision() {
            tracing::debug!(
                read = %snapshot.revision(),
                current = %current.revision(),
                "snapshot changed while ranking; merging against current tasks"
            );
        }
        let revision = current.revision();
        let (mut tasks, mut report) =
            merge_priorities(current.tasks(), &ranked, &*self.clock).into_parts();
        let requested: HashSet<&TaskId> =
            candidates.iter().map(|candidate| &candidate.id).collect();
        report.separate_unseen(|id| requested.contains(id));
        log_report(&report);

        let written = self.store.save(revision, tasks.clone()).await?;
        sort_for_display(&mut tasks);
        tracing::info!(
            ranked = report.ranked,
            dropped = report.dropped.len(),
            revision = %written,
            "tasks prioritized"
        );
        Ok(PrioritizationOutcome::Prioritized(PrioritizationSummary {
            revision: written,
            tasks,
            report,
        }))
    }

    async fn request_ranking(
        &self,
        candidates: &[RankingCandidate],
    ) -> Result<Vec<TaskId>, RankingOracleError> {
        let timeout = self.settings.oracle_timeout;
        tokio::time::timeout(timeout, self.oracle.rank(candidates))
            .await
            .map_err(|_| RankingOracleError::Timeout { after: timeout })?
    }
}

fn log_report(report: &MergeReport) {
    if !report.dropped.is_empty() {
        tracing::warn!(
            dropped = report.dropped.len(),
            "oracle omitted incomplete tasks; their priorities are unchanged"
        );
    }
    if !report.unseen.is_empty() {
        tracing::debug!(
            unseen = report.unseen.len(),
            "tasks added while ranking keep their priority until the next run"
        );
    }
    if report.ignored > 0 {
        tracing::debug!(
            ignored = report.ignored,
            "ignored duplicate or unknown oracle entries"
        );
    }
}
