//! Label and subtask suggestions for a task description.
//!
//! A suggester reads a free-form description and proposes labels and
//! subtasks; the service can merge an accepted suggestion into a stored
//! task.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
