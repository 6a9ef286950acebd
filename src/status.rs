//! Status classification.

use chrono::NaiveDate;

use crate::dates;
use crate::task::{Status, Task};

/// Tasks due within this many days of today are upcoming.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 14;

pub fn classify(task: &Task, today: NaiveDate) -> Status {
    classify_within(task, today, DEFAULT_UPCOMING_WINDOW_DAYS)
}

/// Classify against an explicit upcoming window.
pub fn classify_within(task: &Task, today: NaiveDate, window_days: i64) -> Status {
    if task.completed {
        return Status::Completed;
    }
    if task.due_date < today {
        return Status::Overdue;
    }
    if dates::days_between(today, task.due_date) <= window_days {
        Status::Upcoming
    } else {
        Status::Scheduled
    }
}
