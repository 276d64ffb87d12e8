//! Oracle-driven task re-prioritization.
//!
//! Incomplete tasks are projected into ranking candidates, handed to an
//! external ranking oracle, and the returned ordering is merged back into
//! the full snapshot as contiguous priority ranks. Completed tasks always
//! end up unranked; tasks the oracle drops keep what they had.
//!
//! - Candidate selection and merge policy in [`domain`]
//! - The oracle contract in [`ports`]
//! - Oracle implementations in [`adapters`]
//! - The end-to-end run in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
