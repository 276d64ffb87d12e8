//! Display ordering for task lists.

use super::{Priority, Task};
use std::cmp::Ordering;

/// Compares two optional priorities, treating `None` as after every rank.
#[must_use]
pub fn compare_priority(left: Option<Priority>, right: Option<Priority>) -> Ordering {
    match (left, right) {
        (Some(left_rank), Some(right_rank)) => left_rank.cmp(&right_rank),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders incomplete tasks before completed ones, then by priority.
#[must_use]
pub fn compare_for_display(left: &Task, right: &Task) -> Ordering {
    left.is_completed()
        .cmp(&right.is_completed())
        .then_with(|| compare_priority(left.priority(), right.priority()))
}

/// Sorts tasks for display.
///
/// The sort is stable: tasks that compare equal keep their relative order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(compare_for_display);
}
