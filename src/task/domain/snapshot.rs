//! Versioned task collection exchanged with the task store.

use super::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision marker for a stored snapshot.
///
/// Stores hand out a new revision on every successful save; writers present
/// the revision they read to detect interleaved writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotRevision(u64);

impl SnapshotRevision {
    /// Revision of a store that has never been written.
    pub const INITIAL: Self = Self(0);

    /// Creates a revision from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the revision that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SnapshotRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// The full task collection at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    revision: SnapshotRevision,
    tasks: Vec<Task>,
}

impl TaskSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(revision: SnapshotRevision, tasks: Vec<Task>) -> Self {
        Self { revision, tasks }
    }

    /// Returns the revision this snapshot was read at.
    #[must_use]
    pub const fn revision(&self) -> SnapshotRevision {
        self.revision
    }

    /// Returns the tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the snapshot and returns the tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Returns `true` when the snapshot holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }
}
