//! Step definitions for re-prioritization scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
