//! Then steps for re-prioritization BDD scenarios.

use super::world::{ReprioritizationWorld, run_async};
use dailyflow::prioritization::services::{
    NothingToPrioritize, PrioritizationError, PrioritizationOutcome,
};
use dailyflow::task::{
    domain::{Priority, Task, TaskId},
    ports::TaskStore,
};
use rstest_bdd_macros::then;

fn stored_tasks(world: &ReprioritizationWorld) -> Result<Vec<Task>, eyre::Report> {
    Ok(run_async(world.store.load())?.into_tasks())
}

fn stored_rank(world: &ReprioritizationWorld, id: &str) -> Result<Option<u32>, eyre::Report> {
    let wanted = TaskId::from_string(id)?;
    let task = stored_tasks(world)?
        .into_iter()
        .find(|task| task.id() == &wanted)
        .ok_or_else(|| eyre::eyre!("task {id} missing from store"))?;
    Ok(task.priority().map(Priority::value))
}

#[then(r#"task "{id}" has rank {rank:u32}"#)]
fn task_has_rank(world: &ReprioritizationWorld, id: String, rank: u32) -> Result<(), eyre::Report> {
    let actual = stored_rank(world, &id)?;
    if actual != Some(rank) {
        return Err(eyre::eyre!("expected task {id} at rank {rank}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"task "{id}" is unranked"#)]
fn task_is_unranked(world: &ReprioritizationWorld, id: String) -> Result<(), eyre::Report> {
    let actual = stored_rank(world, &id)?;
    if actual.is_some() {
        return Err(eyre::eyre!("expected task {id} unranked, found {actual:?}"));
    }
    Ok(())
}

#[then("the oracle was asked to rank {count:u32} tasks")]
fn oracle_asked_to_rank(world: &ReprioritizationWorld, count: u32) -> Result<(), eyre::Report> {
    let requests = world.oracle.requests();
    let sent = requests
        .first()
        .ok_or_else(|| eyre::eyre!("oracle was never called"))?;
    if u32::try_from(sent.len()).ok() != Some(count) {
        return Err(eyre::eyre!("expected {count} candidates, got {}", sent.len()));
    }
    Ok(())
}

#[then("the oracle was not called")]
fn oracle_not_called(world: &ReprioritizationWorld) -> Result<(), eyre::Report> {
    let calls = world.oracle.call_count();
    if calls != 0 {
        return Err(eyre::eyre!("expected no oracle calls, got {calls}"));
    }
    Ok(())
}

#[then("the run reports that there are no tasks")]
fn run_reports_no_tasks(world: &ReprioritizationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing prioritization result"))?;
    if !matches!(
        result,
        Ok(PrioritizationOutcome::NothingToPrioritize(
            NothingToPrioritize::NoTasks
        ))
    ) {
        return Err(eyre::eyre!("expected NoTasks outcome, got {result:?}"));
    }
    Ok(())
}

#[then("the run fails with a prioritization error")]
fn run_fails(world: &ReprioritizationWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing prioritization result"))?;
    if !matches!(result, Err(PrioritizationError::PrioritizationFailed(_))) {
        return Err(eyre::eyre!(
            "expected PrioritizationFailed error, got {result:?}"
        ));
    }
    Ok(())
}

#[then("the stored tasks are unchanged")]
fn stored_tasks_unchanged(world: &ReprioritizationWorld) -> Result<(), eyre::Report> {
    let stored = stored_tasks(world)?;
    if stored != world.seeded {
        return Err(eyre::eyre!("stored tasks changed after a failed run"));
    }
    Ok(())
}
