//! Completion transition.
//!
//! One-time tasks toggle between active and completed. Recurring tasks never
//! complete: each completion records `last_completed` and moves the due date
//! forward by the interval, counted from the later of the old due date and
//! today.

use chrono::NaiveDate;

use crate::dates;
use crate::error::{Error, Result};
use crate::task::{Recurrence, Task};

/// Next due date for a recurring task completed on `today`.
pub fn next_due_date(due: NaiveDate, today: NaiveDate, days: u32) -> Result<NaiveDate> {
    let base = due.max(today);
    dates::checked_add_days(base, i64::from(days)).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "cannot reschedule {} by {days} days: date out of range",
            dates::to_iso(base)
        ))
    })
}

/// Apply exactly one completion transition based on `task.completed`.
pub fn complete_or_toggle(task: &Task, today: NaiveDate) -> Result<Task> {
    let mut next = task.clone();
    if task.completed {
        next.completed = false;
        return Ok(next);
    }

    next.last_completed = Some(today);
    match task.recurrence {
        Recurrence::None => {
            next.completed = true;
        }
        Recurrence::Days(days) => {
            next.due_date = next_due_date(task.due_date, today, days.get())?;
            next.completed = false;
        }
    }
    Ok(next)
}
