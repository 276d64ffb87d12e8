//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, TimeZone, Utc};
use dailyflow::clock::ManualClock;
use dailyflow::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{PersistedTaskData, Priority, Task, TaskId, TaskTitle},
};
use rstest::fixture;
use std::sync::Arc;

/// Instant every test clock starts at.
#[must_use]
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Provides a manually driven clock.
#[fixture]
pub fn clock() -> ManualClock {
    ManualClock::new(start_instant())
}

/// Provides a fresh in-memory store for each test.
#[fixture]
pub fn store() -> Arc<InMemoryTaskStore> {
    Arc::new(InMemoryTaskStore::new())
}

/// Builds a stored task in a given state.
///
/// # Errors
///
/// Returns an error if the identifier, title or rank is invalid.
pub fn stored_task(
    id: &str,
    completed: bool,
    priority: Option<u32>,
) -> Result<Task, eyre::Report> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_string(id)?,
        title: TaskTitle::new(format!("Task {id}"))?,
        description: None,
        completed,
        due_date: None,
        estimated_completion_time: None,
        labels: Vec::new(),
        subtasks: Vec::new(),
        priority: priority.map(Priority::new).transpose()?,
        created_at: start_instant(),
        updated_at: start_instant(),
    }))
}

/// Parses a task identifier.
///
/// # Errors
///
/// Returns an error if the identifier is blank.
pub fn task_id(value: &str) -> Result<TaskId, eyre::Report> {
    Ok(TaskId::from_string(value)?)
}

/// Returns the rank of the task with `id`.
///
/// # Errors
///
/// Returns an error if no such task exists.
pub fn priority_of(tasks: &[Task], id: &str) -> Result<Option<u32>, eyre::Report> {
    let wanted = task_id(id)?;
    let task = tasks
        .iter()
        .find(|task| task.id() == &wanted)
        .ok_or_else(|| eyre::eyre!("task {id} not found"))?;
    Ok(task.priority().map(Priority::value))
}
