//! JSON import and export of the task collection.
//!
//! Export writes the collection verbatim. Import is lenient per record: any
//! missing or malformed field falls back to a default, and only a payload that
//! is not a JSON array is rejected.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::dates;
use crate::error::{Error, Result};
use crate::store::{Backend, TaskStore};
use crate::task::{Recurrence, Task, TaskId, DEFAULT_CATEGORY};

pub const DEFAULT_EXPORT_FILE: &str = "home-maintenance-tasks.json";
const UNTITLED: &str = "Untitled";

pub fn export(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parse an import payload into a cleaned task collection.
pub fn import(payload: &str, today: NaiveDate) -> Result<Vec<Task>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| Error::InvalidFormat(format!("not valid JSON: {err}")))?;
    let Value::Array(records) = value else {
        return Err(Error::InvalidFormat(
            "expected a JSON array of tasks".to_string(),
        ));
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut task = clean_record(record, today);
        if !seen.insert(task.id.clone()) {
            tracing::warn!(index, id = %task.id, "duplicate id in import, assigning a new one");
            task.id = TaskId::generate();
            seen.insert(task.id.clone());
        }
        tasks.push(task);
    }
    tracing::debug!(count = tasks.len(), "parsed import payload");
    Ok(tasks)
}

/// Import into a store, replacing its contents. The store is untouched when
/// the payload is rejected.
pub fn import_into<B: Backend>(store: &TaskStore<B>, payload: &str, today: NaiveDate) -> Result<usize> {
    let tasks = import(payload, today)?;
    let count = tasks.len();
    store.replace_all(tasks)?;
    tracing::info!(count, "imported tasks");
    Ok(count)
}

/// Build a task from one loosely shaped record, defaulting every field that
/// is missing or malformed. Used by import and by store repair.
pub(crate) fn clean_record(record: &Value, today: NaiveDate) -> Task {
    let field = |name: &str| record.get(name).filter(|value| is_truthy(value));

    let id = field("id")
        .and_then(coerce_string)
        .map(TaskId::from)
        .unwrap_or_else(TaskId::generate);

    let recurrence = match field("recurrence").and_then(coerce_string) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(id = %id, recurrence = %raw, "invalid recurrence, using none");
            Recurrence::None
        }),
        None => Recurrence::None,
    };

    let due_date = field("dueDate")
        .and_then(coerce_string)
        .and_then(|raw| dates::parse_iso(&raw))
        .unwrap_or(today);

    let mut task = Task {
        name: text_or(field("name"), UNTITLED),
        category: text_or(field("category"), DEFAULT_CATEGORY),
        location: text_or(field("location"), ""),
        due_date,
        recurrence,
        notes: text_or(field("notes"), ""),
        completed: field("completed").is_some(),
        last_completed: field("lastCompleted")
            .and_then(coerce_string)
            .and_then(|raw| dates::parse_iso(&raw)),
        id,
    };
    task.normalize();
    task
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(coerce_string)
        .unwrap_or_else(|| default.to_string())
}

/// Scalars become strings; arrays and objects are treated as malformed.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Loose truthiness: null, false, 0, and "" count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
