//! Service layer for creating, editing, completing, and deleting tasks.
//!
//! Every operation is a read-modify-write of the whole snapshot through the
//! [`TaskStore`] port, guarded by the snapshot revision.

use crate::task::{
    domain::{NewTask, Task, TaskChanges, TaskId, sort_for_display},
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskLifecycleService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Returns all tasks in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the snapshot cannot be read.
    pub async fn list(&self) -> TaskLifecycleResult<Vec<Task>> {
        let mut tasks = self.store.load().await?.into_tasks();
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the snapshot cannot be read.
    pub async fn find(&self, id: &TaskId) -> TaskLifecycleResult<Option<Task>> {
        let snapshot = self.store.load().await?;
        Ok(snapshot.find(id).cloned())
    }

    /// Creates a task and appends it to the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Store`] when the store rejects the write.
    pub async fn create(&self, request: NewTask) -> TaskLifecycleResult<Task> {
        let snapshot = self.store.load().await?;
        let revision = snapshot.revision();
        let task = Task::new(request, &*self.clock);
        let mut tasks = snapshot.into_tasks();
        tasks.push(task.clone());
        self.store.save(revision, tasks).await?;
        tracing::debug!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task has the given
    /// identifier, or store errors.
    pub async fn update(&self, id: &TaskId, changes: TaskChanges) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| task.apply_changes(changes, clock))
            .await
    }

    /// Flips the completion flag of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task has the given
    /// identifier, or store errors.
    pub async fn toggle_complete(&self, id: &TaskId) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| task.toggle_complete(clock))
            .await
    }

    /// Removes a task from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task has the given
    /// identifier, or store errors.
    pub async fn delete(&self, id: &TaskId) -> TaskLifecycleResult<Task> {
        let snapshot = self.store.load().await?;
        let revision = snapshot.revision();
        let mut tasks = snapshot.into_tasks();
        let position = tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| TaskLifecycleError::NotFound(id.clone()))?;
        let removed = tasks.remove(position);
        self.store.save(revision, tasks).await?;
        tracing::debug!(task_id = %id, "task deleted");
        Ok(removed)
    }

    async fn modify(
        &self,
        id: &TaskId,
        change: impl FnOnce(&mut Task, &C),
    ) -> TaskLifecycleResult<Task> {
        let snapshot = self.store.load().await?;
        let revision = snapshot.revision();
        let mut tasks = snapshot.into_tasks();
        let task = tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| TaskLifecycleError::NotFound(id.clone()))?;
        change(task, &*self.clock);
        let updated = task.clone();
        self.store.save(revision, tasks).await?;
        Ok(updated)
    }
}
