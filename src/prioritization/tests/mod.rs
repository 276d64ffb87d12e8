//! Unit tests for the prioritization module.


use crate::task::domain::{
    EstimatedHours, PersistedTaskData, Priority, Task, TaskId, TaskTitle,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub(super) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Builder for tasks in a specific state.
pub(super) struct TaskFixture {
    data: PersistedTaskData,
}

impl TaskFixture {
    pub(super) fn new(id: &str) -> Self {
        Self {
            data: PersistedTaskData {
                id: TaskId::from_string(id).expect("valid id"),
                title: TaskTitle::new(format!("Task {id}")).expect("valid title"),
                description: None,
                completed: false,
                due_date: None,
                estimated_completion_time: None,
                labels: Vec::new(),
                subtasks: Vec::new(),
                priority: None,
                created_at: created_at(),
                updated_at: created_at(),
            },
        }
    }

    pub(super) const fn completed(mut self) -> Self {
        self.data.completed = true;
        self
    }

    pub(super) const fn due(mut self, due: NaiveDate) -> Self {
        self.data.due_date = Some(due);
        self
    }

    pub(super) fn estimate(mut self, hours: &str) -> Self {
        self.data.estimated_completion_time =
            Some(EstimatedHours::new(hours).expect("valid estimate"));
        self
    }

    pub(super) fn priority(mut self, rank: u32) -> Self {
        self.data.priority = Some(Priority::new(rank).expect("valid rank"));
        self
    }

    pub(super) fn build(self) -> Task {
        Task::from_persisted(self.data)
    }
}

pub(super) fn id(value: &str) -> TaskId {
    TaskId::from_string(value).expect("valid id")
}

pub(super) fn rank(value: u32) -> Option<Priority> {
    Some(Priority::new(value).expect("valid rank"))
}
