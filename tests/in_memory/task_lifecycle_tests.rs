//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use super::helpers::{clock, store};
use chrono::{NaiveDate, TimeDelta};
use dailyflow::clock::ManualClock;
use dailyflow::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{EstimatedHours, NewTask, TaskChanges, TaskTitle},
    ports::TaskStore,
    services::{TaskLifecycleError, TaskLifecycleService},
};
use rstest::rstest;

type TestService = TaskLifecycleService<InMemoryTaskStore, ManualClock>;

fn lifecycle_service(store: &Arc<InMemoryTaskStore>, clock: &ManualClock) -> TestService {
    TaskLifecycleService::new(Arc::clone(store), Arc::new(clock.clone()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_starts_open_and_unranked(
    store: Arc<InMemoryTaskStore>,
    clock: ManualClock,
) -> Result<(), eyre::Report> {
    let service = lifecycle_service(&store, &clock);
    let request = NewTask::new(TaskTitle::new("File taxes")?)
        .with_description("Gather receipts first")
        .with_due_date(NaiveDate::from_ymd_opt(2026, 9, 30).ok_or_else(|| eyre::eyre!("date"))?)
        .with_estimated_completion_time(EstimatedHours::new("2.5")?)
        .with_labels(vec!["finance".to_owned()]);

    let created = service.create(request).await?;

    eyre::ensure!(!created.is_completed(), "new task should be open");
    eyre::ensure!(created.priority().is_none(), "new task should be unranked");
    eyre::ensure!(created.created_at() == created.updated_at(), "timestamps differ");
    let snapshot = store.load().await?;
    eyre::ensure!(snapshot.tasks() == [created], "snapshot should hold the new task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_refreshes_updated_at_only(
    store: Arc<InMemoryTaskStore>,
    clock: ManualClock,
) -> Result<(), eyre::Report> {
    let service = lifecycle_service(&store, &clock);
    let created = service.create(NewTask::new(TaskTitle::new("Draft")?)).await?;
    clock.advance(TimeDelta::minutes(3));

    let edited = service
        .update(
            created.id(),
            TaskChanges {
                title: Some(TaskTitle::new("Final")?),
                ..TaskChanges::default()
            },
        )
        .await?;

    eyre::ensure!(edited.title().as_str() == "Final", "title not updated");
    eyre::ensure!(edited.created_at() == created.created_at(), "created_at changed");
    eyre::ensure!(edited.updated_at() > created.updated_at(), "updated_at not refreshed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_is_gone(
    store: Arc<InMemoryTaskStore>,
    clock: ManualClock,
) -> Result<(), eyre::Report> {
    let service = lifecycle_service(&store, &clock);
    let created = service.create(NewTask::new(TaskTitle::new("Call bank")?)).await?;

    service.delete(created.id()).await?;

    eyre::ensure!(service.find(created.id()).await?.is_none(), "task still present");
    let second_delete = service.delete(created.id()).await;
    eyre::ensure!(
        matches!(second_delete, Err(TaskLifecycleError::NotFound(_))),
        "expected NotFound, got {second_delete:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_list_after_open_ones(
    store: Arc<InMemoryTaskStore>,
    clock: ManualClock,
) -> Result<(), eyre::Report> {
    let service = lifecycle_service(&store, &clock);
    let first = service.create(NewTask::new(TaskTitle::new("First")?)).await?;
    let second = service.create(NewTask::new(TaskTitle::new("Second")?)).await?;
    service.toggle_complete(first.id()).await?;

    let listed = service.list().await?;

    let order: Vec<_> = listed.iter().map(|task| task.id().clone()).collect();
    eyre::ensure!(
        order == vec![second.id().clone(), first.id().clone()],
        "unexpected order {order:?}"
    );
    Ok(())
}
