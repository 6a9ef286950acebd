//! homekeep task command implementations (add, edit, done, rm, show).

use serde::Serialize;

use crate::cli::view::{task_fields, task_line};
use crate::cli::{load_context, GlobalOptions};
use crate::dates;
use crate::error::{Error, Result};
use crate::form::{self, FormMode, SubmitOutcome};
use crate::output::{emit_success, Report};
use crate::query::TaskRow;
use crate::status::classify_within;
use crate::task::{Status, Task, TaskDraft};

pub struct AddOptions {
    pub name: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub due: Option<String>,
    pub every: String,
    pub notes: Option<String>,
    pub globals: GlobalOptions,
}

pub struct EditOptions {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub due: Option<String>,
    pub every: Option<String>,
    pub notes: Option<String>,
    pub globals: GlobalOptions,
}

pub struct IdOptions {
    pub id: String,
    pub globals: GlobalOptions,
}

#[derive(Serialize)]
struct RemovedOutput {
    id: String,
    removed: bool,
}

#[derive(Serialize)]
struct ClearedOutput {
    removed: usize,
    remaining: usize,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let mut draft = FormMode::blank(ctx.today);
    draft.name = options.name;
    draft.category = options.category;
    draft.location = options.location;
    if options.due.is_some() {
        draft.due_date = options.due;
    }
    draft.recurrence = Some(options.every);
    draft.notes = options.notes;

    let task = match form::submit(&ctx.store, &FormMode::Creating, &draft)? {
        SubmitOutcome::Created(task) | SubmitOutcome::Updated(task) => task,
        SubmitOutcome::Missing(id) => return Err(Error::TaskNotFound(id.to_string())),
    };
    let row = TaskRow {
        status: classify_within(&task, ctx.today, ctx.window_days()),
        task,
    };

    let mut report = Report::new("Task added");
    task_fields(&mut report, &row);
    report.hint("homekeep list");

    emit_success(options.globals.output(), "add", &row, &report)
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let existing = ctx
        .store
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let draft = overlay(FormMode::prefill(&existing), &options);
    let task = match form::submit(&ctx.store, &FormMode::Editing(id), &draft)? {
        SubmitOutcome::Updated(task) | SubmitOutcome::Created(task) => task,
        SubmitOutcome::Missing(id) => return Err(Error::TaskNotFound(id.to_string())),
    };
    let row = TaskRow {
        status: classify_within(&task, ctx.today, ctx.window_days()),
        task,
    };

    let mut report = Report::new("Task updated");
    task_fields(&mut report, &row);

    emit_success(options.globals.output(), "edit", &row, &report)
}

fn overlay(mut draft: TaskDraft, options: &EditOptions) -> TaskDraft {
    if let Some(name) = options.name.as_ref() {
        draft.name = name.clone();
    }
    let replace = |slot: &mut Option<String>, value: &Option<String>| {
        if value.is_some() {
            *slot = value.clone();
        }
    };
    replace(&mut draft.category, &options.category);
    replace(&mut draft.location, &options.location);
    replace(&mut draft.due_date, &options.due);
    replace(&mut draft.recurrence, &options.every);
    replace(&mut draft.notes, &options.notes);
    draft
}

pub fn run_done(options: IdOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let before = ctx
        .store
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let task = ctx
        .store
        .toggle(&id, ctx.today)?
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let row = TaskRow {
        status: classify_within(&task, ctx.today, ctx.window_days()),
        task,
    };

    let header = completion_header(&before, &row.task);
    let mut report = Report::new(header);
    task_fields(&mut report, &row);
    if row.task.recurrence.is_recurring() {
        report.field("Previous due", dates::format_short(before.due_date));
    }

    emit_success(options.globals.output(), "done", &row, &report)
}

fn completion_header(before: &Task, after: &Task) -> String {
    if before.completed {
        "Task reopened".to_string()
    } else if after.recurrence.is_recurring() {
        format!(
            "Task done, next due {}",
            dates::format_short(after.due_date)
        )
    } else {
        "Task completed".to_string()
    }
}

pub fn run_rm(options: IdOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let removed = ctx.store.delete(&id)?;

    let output = RemovedOutput {
        id: id.to_string(),
        removed,
    };
    let mut report = Report::new(if removed { "Task deleted" } else { "Nothing deleted" });
    report.field("ID", id.to_string());

    emit_success(options.globals.output(), "rm", &output, &report)
}

pub fn run_clear_completed(globals: GlobalOptions) -> Result<()> {
    let ctx = load_context(&globals)?;
    let removed = ctx.store.clear_completed()?;
    let remaining = ctx.store.load().len();

    let output = ClearedOutput { removed, remaining };
    let mut report = Report::new("Completed tasks cleared");
    report.field("Removed", removed.to_string());
    report.field("Remaining", remaining.to_string());

    emit_success(globals.output(), "clear-completed", &output, &report)
}

pub fn run_show(options: IdOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let id = ctx.store.resolve_id(&options.id)?;
    let task = ctx
        .store
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    let row = TaskRow {
        status: classify_within(&task, ctx.today, ctx.window_days()),
        task,
    };

    let mut report = Report::new(row.task.name.clone());
    task_fields(&mut report, &row);
    if row.status == Status::Overdue {
        report.warn(format!(
            "{} days overdue",
            dates::days_between(row.task.due_date, ctx.today)
        ));
    }
    report.block("", [task_line(&row)], "");

    emit_success(options.globals.output(), "show", &row, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;
    use crate::task::{Recurrence, TaskId};

    fn globals() -> GlobalOptions {
        GlobalOptions {
            store: None,
            config: None,
            today: None,
            json: false,
            quiet: true,
        }
    }

    fn task(recurrence: Recurrence, completed: bool) -> Task {
        Task {
            id: TaskId::from("t"),
            name: "Flush drains".to_string(),
            category: "Plumbing".to_string(),
            location: String::new(),
            due_date: parse_iso("2024-06-01").expect("date"),
            recurrence,
            notes: String::new(),
            completed,
            last_completed: None,
        }
    }

    #[test]
    fn overlay_only_replaces_given_fields() {
        let base = FormMode::prefill(&task(Recurrence::None, false));
        let options = EditOptions {
            id: "t".to_string(),
            name: None,
            category: None,
            location: Some("Basement".to_string()),
            due: None,
            every: Some("60".to_string()),
            notes: None,
            globals: globals(),
        };
        let draft = overlay(base, &options);
        assert_eq!(draft.name, "Flush drains");
        assert_eq!(draft.category.as_deref(), Some("Plumbing"));
        assert_eq!(draft.location.as_deref(), Some("Basement"));
        assert_eq!(draft.recurrence.as_deref(), Some("60"));
        assert_eq!(draft.due_date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn completion_headers() {
        let open = task(Recurrence::None, false);
        let done = task(Recurrence::None, true);
        assert_eq!(completion_header(&open, &done), "Task completed");
        assert_eq!(completion_header(&done, &open), "Task reopened");

        let recurring = task(Recurrence::every(30).expect("days"), false);
        let mut next = recurring.clone();
        next.due_date = parse_iso("2024-07-01").expect("date");
        assert_eq!(
            completion_header(&recurring, &next),
            "Task done, next due Jul 1, 2024"
        );
    }
}
