//! In-memory task store used for tests and embedded use.

use crate::task::{
    domain::{SnapshotRevision, Task, TaskSnapshot},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory task store.
///
/// Each successful save advances the revision by one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    revision: SnapshotRevision,
    tasks: Vec<Task>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with tasks at the initial revision.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState {
                revision: SnapshotRevision::INITIAL,
                tasks,
            })),
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn load(&self) -> TaskStoreResult<TaskSnapshot> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(TaskSnapshot::new(state.revision, state.tasks.clone()))
    }

    async fn save(
        &self,
        expected: SnapshotRevision,
        tasks: Vec<Task>,
    ) -> TaskStoreResult<SnapshotRevision> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.revision != expected {
            return Err(TaskStoreError::RevisionConflict {
                expected,
                actual: state.revision,
            });
        }
        state.revision = state.revision.next();
        state.tasks = tasks;
        Ok(state.revision)
    }
}
