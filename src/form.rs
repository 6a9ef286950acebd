//! Create/edit form dispatch.
//!
//! One submit path handles both modes: the caller states whether the form is
//! creating a task or editing an existing one.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::error::Result;
use crate::store::{Backend, TaskStore};
use crate::task::{Task, TaskDraft, TaskId};

/// Days ahead of today used as the default due date for new tasks.
pub const DEFAULT_DUE_OFFSET_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "task", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Created(Task),
    Updated(Task),
    /// The task being edited no longer exists.
    Missing(TaskId),
}

impl FormMode {
    /// Blank form for a new task.
    pub fn blank(today: NaiveDate) -> TaskDraft {
        TaskDraft {
            due_date: Some(dates::to_iso(dates::add_days(today, DEFAULT_DUE_OFFSET_DAYS))),
            ..TaskDraft::default()
        }
    }

    /// Form prefilled from an existing task.
    pub fn prefill(task: &Task) -> TaskDraft {
        TaskDraft {
            name: task.name.clone(),
            category: Some(task.category.clone()),
            location: Some(task.location.clone()),
            due_date: Some(dates::to_iso(task.due_date)),
            recurrence: Some(task.recurrence.to_string()),
            notes: Some(task.notes.clone()),
        }
    }
}

/// Validate the draft and add or update accordingly. Validation failures
/// never reach the store.
pub fn submit<B: Backend>(store: &TaskStore<B>, mode: &FormMode, draft: &TaskDraft) -> Result<SubmitOutcome> {
    let fields = draft.validate()?;
    match mode {
        FormMode::Creating => store.add(Task::new(fields)).map(SubmitOutcome::Created),
        FormMode::Editing(id) => Ok(match store.update(id, fields)? {
            Some(task) => SubmitOutcome::Updated(task),
            None => SubmitOutcome::Missing(id.clone()),
        }),
    }
}
