//! Shared world state for re-prioritization BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dailyflow::clock::ManualClock;
use dailyflow::prioritization::{
    adapters::ScriptedRankingOracle,
    services::{PrioritizationError, PrioritizationOutcome, PrioritizationService},
};
use dailyflow::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{PersistedTaskData, Priority, Task, TaskId, TaskTitle},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestPrioritizationService =
    PrioritizationService<InMemoryTaskStore, ScriptedRankingOracle, ManualClock>;

/// Scenario world for re-prioritization behaviour tests.
pub struct ReprioritizationWorld {
    pub store: Arc<InMemoryTaskStore>,
    pub oracle: Arc<ScriptedRankingOracle>,
    pub clock: ManualClock,
    pub service: TestPrioritizationService,
    pub seeded: Vec<Task>,
    pub last_result: Option<Result<PrioritizationOutcome, PrioritizationError>>,
}

impl ReprioritizationWorld {
    /// Creates a world with an empty store and an echoing oracle.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskStore::new());
        let oracle = Arc::new(ScriptedRankingOracle::new());
        let clock = ManualClock::new(
            Utc.with_ymd_and_hms(2026, 9, 14, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        );
        let service = PrioritizationService::new(
            Arc::clone(&store),
            Arc::clone(&oracle),
            Arc::new(clock.clone()),
        );

        Self {
            store,
            oracle,
            clock,
            service,
            seeded: Vec::new(),
            last_result: None,
        }
    }

    /// Builds a task in the requested state, stamped with the world clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier or rank is invalid.
    pub fn task(
        &self,
        id: &str,
        completed: bool,
        rank: Option<u32>,
    ) -> Result<Task, eyre::Report> {
        let now = mockable::Clock::utc(&self.clock);
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_string(id)?,
            title: TaskTitle::new(format!("Task {id}"))?,
            description: None,
            completed,
            due_date: None,
            estimated_completion_time: None,
            labels: Vec::new(),
            subtasks: Vec::new(),
            priority: rank.map(Priority::new).transpose()?,
            created_at: now,
            updated_at: now,
        }))
    }
}

impl Default for ReprioritizationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReprioritizationWorld {
    ReprioritizationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
