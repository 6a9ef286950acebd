//! Task store.
//!
//! The store is the single source of truth for the task collection. It sits on
//! a [`Backend`] that only knows how to load and save one serialized JSON
//! array; every mutation is a full read-modify-write cycle, and nothing is
//! cached between calls, so reads always observe the latest write.
//!
//! ```text
//! <data dir>/tasks.json        # JSON array of task records
//! <data dir>/tasks.json.lock   # advisory lock held during writes
//! ```

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::dates::{Clock, SystemClock};
use crate::lock::{self, StoreLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::recurrence;
use crate::seed;
use crate::task::{Task, TaskId, TaskPatch};
use crate::transfer;

/// Persistence adapter for the serialized task collection.
pub trait Backend {
    /// Raw payload, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, payload: &str) -> Result<()>;

    /// Exclusive guard held across a read-modify-write cycle.
    fn begin(&self) -> Result<Option<StoreLock>> {
        Ok(None)
    }
}

/// One JSON file on disk, written atomically under a sibling lock file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }
}

impl Backend for JsonFileBackend {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn save(&self, payload: &str) -> Result<()> {
        lock::write_atomic(&self.path, payload.as_bytes())
    }

    fn begin(&self) -> Result<Option<StoreLock>> {
        StoreLock::acquire(&self.path, self.lock_timeout_ms).map(Some)
    }
}

/// In-memory backend for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RefCell<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            data: RefCell::new(Some(payload.into())),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.data.borrow().clone()
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.data.borrow().clone())
    }

    fn save(&self, payload: &str) -> Result<()> {
        *self.data.borrow_mut() = Some(payload.to_string());
        Ok(())
    }
}

/// CRUD and lifecycle operations over the persisted task collection.
#[derive(Debug)]
pub struct TaskStore<B: Backend> {
    backend: B,
    /// Fallback due date for stored records that need repair.
    today: NaiveDate,
}

impl<B: Backend> TaskStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            today: SystemClock.today(),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load every task. A missing or unreadable store, or one that is not a
    /// JSON array, yields an empty collection. Individual records that do not
    /// match the task shape are repaired field by field instead of dropped.
    pub fn load(&self) -> Vec<Task> {
        let payload = match self.backend.load() {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "task store unreadable, starting empty");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Value>(&payload) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                tracing::warn!("task store is not a JSON array, starting empty");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(error = %err, "task store corrupt, starting empty");
                return Vec::new();
            }
        };

        let tasks: Vec<Task> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| self.decode_record(index, record))
            .collect();
        tracing::debug!(count = tasks.len(), "loaded tasks");
        tasks
    }

    fn decode_record(&self, index: usize, record: Value) -> Task {
        let mut task = match Task::deserialize(&record) {
            Ok(task) => task,
            Err(err) => {
                tracing::warn!(index, error = %err, "repairing malformed task record");
                transfer::clean_record(&record, self.today)
            }
        };
        task.normalize();
        task
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.load().into_iter().find(|task| &task.id == id)
    }

    /// Resolve a full id or a unique id prefix.
    pub fn resolve_id(&self, input: &str) -> Result<TaskId> {
        let trimmed = input.trim().to_lowercase();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        let tasks = self.load();
        if let Some(task) = tasks
            .iter()
            .find(|task| task.id.as_str().to_lowercase() == trimmed)
        {
            return Ok(task.id.clone());
        }

        let mut matches: Vec<&TaskId> = tasks
            .iter()
            .map(|task| &task.id)
            .filter(|id| id.as_str().to_lowercase().starts_with(&trimmed))
            .collect();
        matches.sort();
        matches.dedup();

        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(input.trim().to_string())),
            [id] => Ok((*id).clone()),
            many => Err(Error::InvalidArgument(format!(
                "ambiguous task id '{}': {}",
                input.trim(),
                many.iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    pub fn add(&self, task: Task) -> Result<Task> {
        let added = self.modify(|tasks| {
            if tasks.iter().any(|existing| existing.id == task.id) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
            let mut task = task;
            task.normalize();
            tasks.push(task.clone());
            Ok(Some(task))
        })?;
        let added = added.ok_or_else(|| Error::InvalidArgument("task not added".to_string()))?;
        tracing::info!(id = %added.id, name = %added.name, "task added");
        Ok(added)
    }

    /// Overwrite the editable fields of a task. Unknown ids are a no-op.
    pub fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let updated = self.modify(|tasks| {
            Ok(tasks.iter_mut().find(|task| &task.id == id).map(|task| {
                task.apply(patch);
                task.clone()
            }))
        })?;
        if updated.is_none() {
            tracing::debug!(id = %id, "update ignored, task not found");
        }
        Ok(updated)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete(&self, id: &TaskId) -> Result<bool> {
        let removed = self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| &task.id != id);
            Ok((tasks.len() != before).then_some(()))
        })?;
        Ok(removed.is_some())
    }

    /// Apply the completion transition to one task. Unknown ids are a no-op.
    pub fn toggle(&self, id: &TaskId, today: NaiveDate) -> Result<Option<Task>> {
        let toggled = self.modify(|tasks| {
            let Some(task) = tasks.iter_mut().find(|task| &task.id == id) else {
                return Ok(None);
            };
            *task = recurrence::complete_or_toggle(task, today)?;
            Ok(Some(task.clone()))
        })?;
        if let Some(task) = toggled.as_ref() {
            tracing::info!(
                id = %task.id,
                completed = task.completed,
                due = %task.due_date,
                "task toggled"
            );
        }
        Ok(toggled)
    }

    /// Drop every completed task. Returns how many were removed.
    pub fn clear_completed(&self) -> Result<usize> {
        let removed = self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|task| !task.completed);
            Ok(Some(before - tasks.len()))
        })?;
        Ok(removed.unwrap_or(0))
    }

    /// Replace the whole collection (import).
    pub fn replace_all(&self, tasks: Vec<Task>) -> Result<()> {
        self.modify(|current| {
            *current = tasks;
            current.iter_mut().for_each(Task::normalize);
            Ok(Some(()))
        })?;
        Ok(())
    }

    /// Populate the sample tasks when the store is empty. Returns whether
    /// anything was written.
    pub fn seed(&self, today: NaiveDate) -> Result<bool> {
        let seeded = self.modify(|tasks| {
            if !tasks.is_empty() {
                return Ok(None);
            }
            *tasks = seed::sample_tasks(today);
            Ok(Some(tasks.len()))
        })?;
        if let Some(count) = seeded {
            tracing::info!(count, "seeded sample tasks");
        }
        Ok(seeded.is_some())
    }

    /// Lock, load, mutate, and save. The collection is only written back when
    /// `f` returns `Some`.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> Result<Option<T>>) -> Result<Option<T>> {
        let _guard = self.backend.begin()?;
        let mut tasks = self.load();
        let outcome = f(&mut tasks)?;
        if outcome.is_some() {
            self.write(&tasks)?;
        }
        Ok(outcome)
    }

    fn write(&self, tasks: &[Task]) -> Result<()> {
        let payload = serde_json::to_string_pretty(tasks)?;
        self.backend.save(&payload)
    }
}
