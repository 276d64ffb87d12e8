//! In-memory integration tests for full re-prioritization runs.

use std::sync::Arc;

use super::helpers::{clock, priority_of, stored_task, task_id};
use dailyflow::clock::ManualClock;
use dailyflow::prioritization::{
    adapters::{DeadlineRankingOracle, ScriptedRankingOracle},
    services::{PrioritizationOutcome, PrioritizationService},
};
use dailyflow::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{NewTask, TaskTitle},
    ports::TaskStore,
    services::TaskLifecycleService,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scripted_ranking_is_persisted(clock: ManualClock) -> Result<(), eyre::Report> {
    let store = Arc::new(InMemoryTaskStore::with_tasks(vec![
        stored_task("1", false, None)?,
        stored_task("2", true, Some(5))?,
    ]));
    let oracle = Arc::new(ScriptedRankingOracle::new());
    oracle.push_ranking([task_id("1")?]);
    let service = PrioritizationService::new(Arc::clone(&store), oracle, Arc::new(clock));

    let outcome = service.prioritize().await?;

    eyre::ensure!(
        matches!(outcome, PrioritizationOutcome::Prioritized(_)),
        "expected a prioritized run, got {outcome:?}"
    );
    let snapshot = store.load().await?;
    eyre::ensure!(priority_of(snapshot.tasks(), "1")? == Some(1), "task 1 not ranked first");
    eyre::ensure!(priority_of(snapshot.tasks(), "2")?.is_none(), "task 2 still ranked");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_oracle_ranks_created_tasks(clock: ManualClock) -> Result<(), eyre::Report> {
    let store = Arc::new(InMemoryTaskStore::new());
    let shared_clock = Arc::new(clock);
    let lifecycle = TaskLifecycleService::new(Arc::clone(&store), Arc::clone(&shared_clock));
    let later = lifecycle
        .create(NewTask::new(TaskTitle::new("Undated")?))
        .await?;
    let sooner = lifecycle
        .create(
            NewTask::new(TaskTitle::new("Tomorrow")?)
                .with_due_date(chrono::NaiveDate::from_ymd_opt(2026, 9, 15).ok_or_else(
                    || eyre::eyre!("invalid date"),
                )?),
        )
        .await?;
    let service = PrioritizationService::new(
        Arc::clone(&store),
        Arc::new(DeadlineRankingOracle::new()),
        shared_clock,
    );

    service.prioritize().await?;

    let listed = lifecycle.list().await?;
    let order: Vec<_> = listed.iter().map(|task| task.id().clone()).collect();
    eyre::ensure!(
        order == vec![sooner.id().clone(), later.id().clone()],
        "unexpected order {order:?}"
    );
    eyre::ensure!(
        priority_of(&listed, sooner.id().as_str())? == Some(1),
        "dated task should rank first"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_runs_are_stable(clock: ManualClock) -> Result<(), eyre::Report> {
    let store = Arc::new(InMemoryTaskStore::with_tasks(vec![
        stored_task("a", false, None)?,
        stored_task("b", false, None)?,
    ]));
    let service = PrioritizationService::new(
        Arc::clone(&store),
        Arc::new(DeadlineRankingOracle::new()),
        Arc::new(clock),
    );

    service.prioritize().await?;
    let first = store.load().await?;
    service.prioritize().await?;
    let second = store.load().await?;

    for id in ["a", "b"] {
        eyre::ensure!(
            priority_of(first.tasks(), id)? == priority_of(second.tasks(), id)?,
            "rank of {id} changed between runs"
        );
    }
    eyre::ensure!(second.revision() == first.revision().next(), "revision not advanced");
    Ok(())
}
