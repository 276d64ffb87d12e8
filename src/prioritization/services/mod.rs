//! Application services for re-prioritization.

mod reprioritize;

pub use reprioritize::{
    NothingToPrioritize, PrioritizationError, PrioritizationOutcome, PrioritizationResult,
    PrioritizationService, PrioritizationSettings, PrioritizationSummary,
};
