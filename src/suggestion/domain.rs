//! Suggestion values.

use serde::{Deserialize, Serialize};

/// Labels and subtasks proposed for a task.
///
/// Entries are trimmed, blank entries dropped, and duplicates removed
/// (labels case-insensitively) while keeping first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailSuggestion {
    labels: Vec<String>,
    subtasks: Vec<String>,
}

impl TaskDetailSuggestion {
    /// Creates a normalized suggestion.
    #[must_use]
    pub fn new(
        labels: impl IntoIterator<Item = String>,
        subtasks: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            labels: normalize(labels, |left, right| left.eq_ignore_ascii_case(right)),
            subtasks: normalize(subtasks, |left, right| left == right),
        }
    }

    /// Returns the suggested labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the suggested subtasks.
    #[must_use]
    pub fn subtasks(&self) -> &[String] {
        &self.subtasks
    }

    /// Returns `true` when nothing was suggested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.subtasks.is_empty()
    }
}

fn normalize(
    values: impl IntoIterator<Item = String>,
    same: impl Fn(&str, &str) -> bool,
) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || normalized.iter().any(|existing| same(existing, trimmed)) {
            continue;
        }
        normalized.push(trimmed.to_owned());
    }
    normalized
}
