//! Task management for Dailyflow.
//!
//! This module owns the task aggregate and the task store boundary: tasks are
//! created, edited, completed, and deleted through whole-snapshot replacement
//! guarded by a revision. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
