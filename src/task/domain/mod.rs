//! Domain model for personal task management.
//!
//! The task domain models the task aggregate, its validated scalar values,
//! display ordering, and the snapshot exchanged with the task store while
//! keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod ordering;
mod snapshot;
mod task;

pub use error::TaskDomainError;
pub use ids::{EstimatedHours, Priority, TaskId, TaskTitle};
pub use ordering::{compare_for_display, compare_priority, sort_for_display};
pub use snapshot::{SnapshotRevision, TaskSnapshot};
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges};
