//! Merge of an oracle ordering back into the full task snapshot.

use crate::task::domain::{Priority, Task, TaskId};
use mockable::Clock;
use std::collections::{HashMap, HashSet};

/// Mapping from task identifier to its assigned rank.
///
/// Ranks are handed out 1..k in oracle order to accepted identifiers only.
/// Repeated identifiers keep their first position; identifiers that are
/// unknown or not eligible are counted as ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankLookup {
    ranks: HashMap<TaskId, Priority>,
    ignored: usize,
}

impl RankLookup {
    /// Builds the lookup from an oracle ordering.
    pub fn build<'a>(
        ranked: impl IntoIterator<Item = &'a TaskId>,
        is_eligible: impl Fn(&TaskId) -> bool,
    ) -> Self {
        let mut lookup = Self::default();
        let mut next = Priority::FIRST;
        for id in ranked {
            if lookup.ranks.contains_key(id) || !is_eligible(id) {
                lookup.ignored += 1;
                continue;
            }
            lookup.ranks.insert(id.clone(), next);
            next = next.next();
        }
        lookup
    }

    /// Returns the rank assigned to `id`, if any.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<Priority> {
        self.ranks.get(id).copied()
    }

    /// Returns the number of ranked identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns `true` when no identifier was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Returns the number of oracle entries that were skipped.
    #[must_use]
    pub const fn ignored(&self) -> usize {
        self.ignored
    }
}

/// Summary of what a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Incomplete tasks that received a rank.
    pub ranked: usize,
    /// Completed tasks reset to unranked.
    pub completed: usize,
    /// Incomplete tasks the oracle left out; their priority is unchanged.
    pub dropped: Vec<TaskId>,
    /// Oracle entries skipped as duplicates, unknown, or completed.
    pub ignored: usize,
    /// Incomplete tasks the oracle was never shown, such as tasks created
    /// while it was ranking; their priority is unchanged.
    pub unseen: Vec<TaskId>,
}

impl MergeReport {
    /// Moves dropped tasks that were not part of the ranking request into
    /// [`MergeReport::unseen`].
    pub fn separate_unseen(&mut self, was_requested: impl Fn(&TaskId) -> bool) {
        let (dropped, unseen): (Vec<TaskId>, Vec<TaskId>) = std::mem::take(&mut self.dropped)
            .into_iter()
            .partition(|id| was_requested(id));
        self.dropped = dropped;
        self.unseen.extend(unseen);
    }
}

/// Result of merging an oracle ordering into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMerge {
    tasks: Vec<Task>,
    report: MergeReport,
}

impl PriorityMerge {
    /// Returns the merged tasks, in the order of the original snapshot.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the merge summary.
    #[must_use]
    pub const fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Consumes the merge and returns tasks and summary.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Task>, MergeReport) {
        (self.tasks, self.report)
    }
}

/// Applies an oracle ordering to a snapshot.
///
/// The returned collection has exactly the identifiers of `original`:
/// - completed tasks become unranked and are touched;
/// - incomplete tasks in the ordering get their rank and are touched;
/// - incomplete tasks missing from the ordering are returned unchanged.
#[must_use]
pub fn merge_priorities(original: &[Task], ranked: &[TaskId], clock: &impl Clock) -> PriorityMerge {
    let eligible: HashSet<&TaskId> = original
        .iter()
        .filter(|task| !task.is_completed())
        .map(Task::id)
        .collect();
    let lookup = RankLookup::build(ranked, |id| eligible.contains(id));

    let mut report = MergeReport {
        ignored: lookup.ignored(),
        ..MergeReport::default()
    };
    let mut tasks = Vec::with_capacity(original.len());
    for task in original {
        let mut merged = task.clone();
        if task.is_completed() {
            merged.clear_priority(clock);
            report.completed += 1;
        } else if let Some(rank) = lookup.get(task.id()) {
            merged.assign_priority(rank, clock);
            report.ranked += 1;
        } else {
            report.dropped.push(task.id().clone());
        }
        tasks.push(merged);
    }

    PriorityMerge { tasks, report }
}
