//! Adapter implementations for the ranking oracle port.

pub mod deadline;
pub mod memory;
pub mod ollama;

pub use deadline::DeadlineRankingOracle;
pub use memory::ScriptedRankingOracle;
pub use ollama::OllamaRankingOracle;
