//! When steps for re-prioritization BDD scenarios.

use super::world::{ReprioritizationWorld, run_async};
use rstest_bdd_macros::when;

#[when("the tasks are prioritized")]
fn tasks_are_prioritized(world: &mut ReprioritizationWorld) {
    let result = run_async(world.service.prioritize());
    world.last_result = Some(result);
}
