//! Given steps for re-prioritization BDD scenarios.

use super::world::{ReprioritizationWorld, run_async};
use dailyflow::prioritization::ports::RankingOracleError;
use dailyflow::task::{domain::TaskId, ports::TaskStore};
use eyre::WrapErr;
use rstest_bdd_macros::given;

fn seed(
    world: &mut ReprioritizationWorld,
    id: &str,
    completed: bool,
    rank: Option<u32>,
) -> Result<(), eyre::Report> {
    let task = world.task(id, completed, rank)?;
    world.seeded.push(task);
    let current = run_async(world.store.load()).wrap_err("load store before seeding")?;
    run_async(world.store.save(current.revision(), world.seeded.clone()))
        .wrap_err("seed store with scenario tasks")?;
    Ok(())
}

#[given(r#"an unranked open task "{id}""#)]
fn open_task(world: &mut ReprioritizationWorld, id: String) -> Result<(), eyre::Report> {
    seed(world, &id, false, None)
}

#[given(r#"an open task "{id}" ranked {rank:u32}"#)]
fn ranked_open_task(
    world: &mut ReprioritizationWorld,
    id: String,
    rank: u32,
) -> Result<(), eyre::Report> {
    seed(world, &id, false, Some(rank))
}

#[given(r#"a completed task "{id}" ranked {rank:u32}"#)]
fn ranked_completed_task(
    world: &mut ReprioritizationWorld,
    id: String,
    rank: u32,
) -> Result<(), eyre::Report> {
    seed(world, &id, true, Some(rank))
}

#[given(r#"the oracle will rank "{ids}""#)]
fn oracle_will_rank(world: &mut ReprioritizationWorld, ids: String) -> Result<(), eyre::Report> {
    let ranking = ids
        .split(',')
        .map(|id| TaskId::from_string(id.trim()))
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("parse scripted ranking")?;
    world.oracle.push_ranking(ranking);
    Ok(())
}

#[given("the oracle is unavailable")]
fn oracle_is_unavailable(world: &mut ReprioritizationWorld) {
    world
        .oracle
        .push_failure(RankingOracleError::unavailable(std::io::Error::other(
            "connection refused",
        )));
}
