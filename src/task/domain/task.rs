//! Task aggregate root and the request types that mutate it.

use super::{EstimatedHours, Priority, TaskId, TaskTitle};
use crate::suggestion::domain::TaskDetailSuggestion;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Task aggregate root.
///
/// The serialized layout uses camelCase field names and millisecond
/// timestamps so snapshots stay readable by the browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_hours"
    )]
    estimated_completion_time: Option<EstimatedHours>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subtasks: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_priority")]
    priority: Option<Priority>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted free-form description, if any.
    pub description: Option<String>,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted time estimate, if any.
    pub estimated_completion_time: Option<EstimatedHours>,
    /// Persisted labels.
    pub labels: Vec<String>,
    /// Persisted subtasks.
    pub subtasks: Vec<String>,
    /// Persisted priority rank, if any.
    pub priority: Option<Priority>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: TaskTitle,
    description: Option<String>,
    due_date: Option<NaiveDate>,
    estimated_completion_time: Option<EstimatedHours>,
    labels: Vec<String>,
    subtasks: Vec<String>,
}

impl NewTask {
    /// Creates a request with the required title.
    #[must_use]
    pub const fn new(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            due_date: None,
            estimated_completion_time: None,
            labels: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the time estimate.
    #[must_use]
    pub fn with_estimated_completion_time(mut self, estimate: EstimatedHours) -> Self {
        self.estimated_completion_time = Some(estimate);
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Sets the subtasks.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: impl IntoIterator<Item = String>) -> Self {
        self.subtasks = subtasks.into_iter().collect();
        self
    }
}

/// Partial update applied to an existing task.
///
/// Outer `None` leaves a field untouched; for optional fields the inner
/// `Option` sets or clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<Option<String>>,
    /// Replacement due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// Replacement time estimate.
    pub estimated_completion_time: Option<Option<EstimatedHours>>,
    /// Replacement labels.
    pub labels: Option<Vec<String>>,
    /// Replacement subtasks.
    pub subtasks: Option<Vec<String>>,
}

impl TaskChanges {
    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.estimated_completion_time.is_none()
            && self.labels.is_none()
            && self.subtasks.is_none()
    }
}

impl Task {
    /// Creates a new, incomplete and unranked task.
    #[must_use]
    pub fn new(request: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: request.title,
            description: request.description,
            completed: false,
            due_date: request.due_date,
            estimated_completion_time: request.estimated_completion_time,
            labels: request.labels,
            subtasks: request.subtasks,
            priority: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            due_date: data.due_date,
            estimated_completion_time: data.estimated_completion_time,
            labels: data.labels,
            subtasks: data.subtasks,
            priority: data.priority,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` once the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the time estimate, if any.
    #[must_use]
    pub const fn estimated_completion_time(&self) -> Option<&EstimatedHours> {
        self.estimated_completion_time.as_ref()
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the subtasks.
    #[must_use]
    pub fn subtasks(&self) -> &[String] {
        &self.subtasks
    }

    /// Returns the priority rank; `None` sorts after every rank.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// An empty change set leaves the task, including `updated_at`, as is.
    pub fn apply_changes(&mut self, changes: TaskChanges, clock: &impl Clock) {
        if changes.is_empty() {
            return;
        }
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(estimate) = changes.estimated_completion_time {
            self.estimated_completion_time = estimate;
        }
        if let Some(labels) = changes.labels {
            self.labels = labels;
        }
        if let Some(subtasks) = changes.subtasks {
            self.subtasks = subtasks;
        }
        self.touch(clock);
    }

    /// Flips the completion flag.
    pub fn toggle_complete(&mut self, clock: &impl Clock) {
        self.completed = !self.completed;
        self.touch(clock);
    }

    /// Sets the priority rank.
    pub fn assign_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = Some(priority);
        self.touch(clock);
    }

    /// Moves the task to the unranked tail.
    pub fn clear_priority(&mut self, clock: &impl Clock) {
        self.priority = None;
        self.touch(clock);
    }

    /// Merges suggested labels and subtasks into the task.
    ///
    /// Labels are compared case-insensitively; subtasks already present are
    /// skipped. Returns `true` when anything was added.
    pub fn apply_suggestion(
        &mut self,
        suggestion: &TaskDetailSuggestion,
        clock: &impl Clock,
    ) -> bool {
        let labels_added = merge_unique(&mut self.labels, suggestion.labels(), |existing, new| {
            existing.eq_ignore_ascii_case(new)
        });
        let subtasks_added = merge_unique(&mut self.subtasks, suggestion.subtasks(), |existing, new| {
            existing == new
        });
        let changed = labels_added || subtasks_added;
        if changed {
            self.touch(clock);
        }
        changed
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn merge_unique(
    target: &mut Vec<String>,
    additions: &[String],
    same: impl Fn(&str, &str) -> bool,
) -> bool {
    let mut changed = false;
    for addition in additions {
        if !target.iter().any(|existing| same(existing, addition)) {
            target.push(addition.clone());
            changed = true;
        }
    }
    changed
}

/// Treats a blank persisted estimate as absent.
fn deserialize_optional_hours<'de, D>(deserializer: D) -> Result<Option<EstimatedHours>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => EstimatedHours::new(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Reads a persisted rank, treating anything that is not a whole number in
/// `1..=u32::MAX` as unranked.
///
/// Browser-created tasks carry a millisecond timestamp as their priority
/// until the first prioritization run, and an unranked browser task
/// serializes its infinite priority as `null`.
fn deserialize_optional_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .and_then(|value| Priority::new(value).ok()))
}
