//! Store port for whole-snapshot task persistence.

use crate::task::domain::{SnapshotRevision, Task, TaskSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// The store owns the snapshot. Readers receive a copy tagged with the
/// revision it was read at and writers replace the whole collection.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Reads the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the backing storage
    /// cannot be read or decoded.
    async fn load(&self) -> TaskStoreResult<TaskSnapshot>;

    /// Replaces the stored collection and returns the new revision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::RevisionConflict`] when the stored revision
    /// differs from `expected`; nothing is written in that case. Returns
    /// [`TaskStoreError::Persistence`] when the write fails.
    async fn save(
        &self,
        expected: SnapshotRevision,
        tasks: Vec<Task>,
    ) -> TaskStoreResult<SnapshotRevision>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The snapshot changed since it was read.
    #[error("task snapshot changed: expected revision {expected}, found {actual}")]
    RevisionConflict {
        /// Revision the writer read.
        expected: SnapshotRevision,
        /// Revision currently stored.
        actual: SnapshotRevision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
