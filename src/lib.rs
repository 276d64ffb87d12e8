//! Dailyflow: personal task management with oracle-driven prioritization.
//!
//! Users create, edit, complete, and delete tasks with optional due dates,
//! labels, and time estimates. An external ranking oracle can re-order the
//! open tasks, and a suggester can propose labels and subtasks for a
//! description.
//!
//! # Architecture
//!
//! Dailyflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, models, fakes)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate and the task store boundary
//! - [`prioritization`]: Candidate selection, oracle ranking, and rank merge
//! - [`suggestion`]: Label and subtask suggestions
//! - [`llm`]: Shared Ollama client
//! - [`config`]: TOML configuration

pub mod clock;
pub mod config;
pub mod llm;
pub mod prioritization;
pub mod suggestion;
pub mod task;
