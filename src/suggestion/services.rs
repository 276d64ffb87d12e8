//! Service layer for requesting and applying suggestions.

use super::{
    domain::TaskDetailSuggestion,
    ports::{TaskDetailSuggester, TaskDetailSuggesterError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for suggestions.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// The description is blank, so there is nothing to suggest from.
    #[error("task description must not be empty")]
    EmptyDescription,
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The suggester failed.
    #[error("suggestion failed: {0}")]
    Suggester(#[from] TaskDetailSuggesterError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for suggestion operations.
pub type SuggestionResult<T> = Result<T, SuggestionError>;

/// Suggestion orchestration service.
#[derive(Clone)]
pub struct SuggestionService<S, G, C>
where
    S: TaskStore,
    G: TaskDetailSuggester,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    suggester: Arc<G>,
    clock: Arc<C>,
}

impl<S, G, C> SuggestionService<S, G, C>
where
    S: TaskStore,
    G: TaskDetailSuggester,
    C: Clock + Send + Sync,
{
    /// Creates a suggestion service.
    #[must_use]
    pub const fn new(store: Arc<S>, suggester: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            store,
            suggester,
            clock,
        }
    }

    /// Requests suggestions for a description.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::EmptyDescription`] without calling the
    /// suggester when the description is blank, or suggester errors.
    pub async fn suggest(&self, description: &str) -> SuggestionResult<TaskDetailSuggestion> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(SuggestionError::EmptyDescription);
        }
        let suggestion = self.suggester.suggest(trimmed).await.inspect_err(|err| {
            tracing::warn!(error = %err, "suggestion request failed");
        })?;
        tracing::debug!(
            labels = suggestion.labels().len(),
            subtasks = suggestion.subtasks().len(),
            "suggestion received"
        );
        Ok(suggestion)
    }

    /// Merges a suggestion into a stored task.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::NotFound`] when no task has the given
    /// identifier, or store errors.
    pub async fn apply_to_task(
        &self,
        id: &TaskId,
        suggestion: &TaskDetailSuggestion,
    ) -> SuggestionResult<Task> {
        let snapshot = self.store.load().await?;
        let revision = snapshot.revision();
        let mut tasks = snapshot.into_tasks();
        let task = tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| SuggestionError::NotFound(id.clone()))?;
        if !task.apply_suggestion(suggestion, &*self.clock) {
            return Ok(task.clone());
        }
        let updated = task.clone();
        self.store.save(revision, tasks).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::{SuggestionError, SuggestionService};
    use crate::clock::ManualClock;
    use crate::suggestion::{
        domain::TaskDetailSuggestion,
        ports::{TaskDetailSuggester, TaskDetailSuggesterError, TaskDetailSuggesterResult},
    };
    use crate::task::{
        adapters::InMemoryTaskStore,
        domain::{NewTask, Task, TaskTitle},
        ports::TaskStore,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        Suggester {}

        #[async_trait]
        impl TaskDetailSuggester for Suggester {
            async fn suggest(&self, description: &str) -> TaskDetailSuggesterResult<TaskDetailSuggestion>;
        }
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).single().expect("valid"))
    }

    #[tokio::test]
    async fn blank_description_skips_suggester() {
        let mut suggester = MockSuggester::new();
        suggester.expect_suggest().never();
        let service = SuggestionService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(suggester),
            Arc::new(clock()),
        );

        let result = service.suggest("   ").await;

        assert!(matches!(result, Err(SuggestionError::EmptyDescription)));
    }

    #[tokio::test]
    async fn suggester_failure_is_surfaced() {
        let mut suggester = MockSuggester::new();
        suggester
            .expect_suggest()
            .times(1)
            .returning(|_| Err(TaskDetailSuggesterError::Timeout(5)));
        let service = SuggestionService::new(
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(suggester),
            Arc::new(clock()),
        );

        let result = service.suggest("Paint the fence").await;

        assert!(matches!(
            result,
            Err(SuggestionError::Suggester(TaskDetailSuggesterError::Timeout(5)))
        ));
    }

    #[tokio::test]
    async fn apply_to_task_persists_merged_details() {
        let clock = clock();
        let task = Task::new(
            NewTask::new(TaskTitle::new("Paint the fence").expect("title")),
            &clock,
        );
        let id = task.id().clone();
        let store = Arc::new(InMemoryTaskStore::with_tasks(vec![task]));
        let service = SuggestionService::new(
            Arc::clone(&store),
            Arc::new(MockSuggester::new()),
            Arc::new(clock),
        );
        let suggestion =
            TaskDetailSuggestion::new(vec!["garden".to_owned()], vec!["Buy paint".to_owned()]);

        let updated = service
            .apply_to_task(&id, &suggestion)
            .await
            .expect("apply suggestion");

        let stored = store.load().await.expect("load");
        assert_eq!(updated.labels(), ["garden".to_owned()]);
        assert_eq!(stored.find(&id), Some(&updated));
    }
}
