//! Maintenance task data model.
//!
//! A [`Task`] is the only persisted entity. Its JSON shape (camelCase keys,
//! ISO dates, recurrence as `"none"` or a day count string) is shared by the
//! store file and the export format.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

use crate::dates;
use crate::error::{Error, Result};

pub const DEFAULT_CATEGORY: &str = "Other";
pub const RECURRENCE_NONE: &str = "none";
/// Longest recurrence interval, one hundred years.
pub const MAX_RECURRENCE_DAYS: u32 = 36_500;

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Opaque, unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Fresh identifier (lowercase ULID).
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recurrence interval. Recurring tasks are rescheduled instead of completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recurrence {
    #[default]
    None,
    Days(NonZeroU32),
}

impl Recurrence {
    /// `None` for zero or anything longer than [`MAX_RECURRENCE_DAYS`].
    pub fn every(days: u32) -> Option<Self> {
        if days > MAX_RECURRENCE_DAYS {
            return None;
        }
        NonZeroU32::new(days).map(Recurrence::Days)
    }

    pub fn days(&self) -> Option<u32> {
        match self {
            Recurrence::None => None,
            Recurrence::Days(days) => Some(days.get()),
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Recurrence::Days(_))
    }

    pub fn label(&self) -> String {
        match self.days() {
            None => "One-time".to_string(),
            Some(30) => "Every 30 days".to_string(),
            Some(90) => "Every 90 days".to_string(),
            Some(180) => "Every 6 months".to_string(),
            Some(365) => "Annually".to_string(),
            Some(days) => format!("Every {days} days"),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => f.write_str(RECURRENCE_NONE),
            Recurrence::Days(days) => write!(f, "{days}"),
        }
    }
}

impl FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(RECURRENCE_NONE) {
            return Ok(Recurrence::None);
        }
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(Recurrence::every)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid recurrence '{s}': expected 'none' or 1-{MAX_RECURRENCE_DAYS} days"
                ))
            })
    }
}

impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecurrenceVisitor;

        impl<'de> Visitor<'de> for RecurrenceVisitor {
            type Value = Recurrence;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("\"none\" or a positive number of days")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Recurrence, E> {
                value.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Recurrence, E> {
                u32::try_from(value)
                    .ok()
                    .and_then(Recurrence::every)
                    .ok_or_else(|| E::custom(format!("invalid recurrence {value}")))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Recurrence, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("invalid recurrence {value}")))
                    .and_then(|value| self.visit_u64(value))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Recurrence, E> {
                Ok(Recurrence::None)
            }
        }

        deserializer.deserialize_any(RecurrenceVisitor)
    }
}

/// A household maintenance task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

impl Task {
    /// Create an active task with a fresh id from validated fields.
    pub fn new(fields: TaskPatch) -> Self {
        let mut task = Self {
            id: TaskId::generate(),
            name: String::new(),
            category: default_category(),
            location: String::new(),
            due_date: fields.due_date,
            recurrence: Recurrence::None,
            notes: String::new(),
            completed: false,
            last_completed: None,
        };
        task.apply(fields);
        task
    }

    /// Overwrite the editable fields. Completion bookkeeping is kept, except a
    /// completed task that becomes recurring is re-activated.
    pub fn apply(&mut self, patch: TaskPatch) {
        self.name = patch.name;
        self.category = patch.category;
        self.location = patch.location;
        self.due_date = patch.due_date;
        self.recurrence = patch.recurrence;
        self.notes = patch.notes;
        self.normalize();
    }

    /// Enforce `completed => recurrence == none`.
    pub fn normalize(&mut self) {
        if self.recurrence.is_recurring() {
            self.completed = false;
        }
    }

    /// Text searched by the task table filter.
    pub fn search_fields(&self) -> [&str; 4] {
        [&self.name, &self.category, &self.location, &self.notes]
    }

    /// `Category • Location` subtitle used by list and detail views.
    pub fn subtitle(&self) -> String {
        if self.location.is_empty() {
            self.category.clone()
        } else {
            format!("{} \u{2022} {}", self.category, self.location)
        }
    }
}

/// Editable task fields, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: String,
    pub category: String,
    pub location: String,
    pub due_date: NaiveDate,
    pub recurrence: Recurrence,
    pub notes: String,
}

/// Raw form input for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub due_date: Option<String>,
    pub recurrence: Option<String>,
    pub notes: Option<String>,
}

impl TaskDraft {
    /// Trim and check the draft. A name and a valid due date are required.
    pub fn validate(&self) -> Result<TaskPatch> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "task name cannot be empty".to_string(),
            ));
        }

        let due_raw = self.due_date.as_deref().unwrap_or("").trim();
        if due_raw.is_empty() {
            return Err(Error::InvalidArgument("due date is required".to_string()));
        }
        let due_date = dates::parse_iso_arg("due", due_raw)?;

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let recurrence = match self.recurrence.as_deref() {
            Some(value) => value.parse()?,
            None => Recurrence::None,
        };

        Ok(TaskPatch {
            name: name.to_string(),
            category,
            location: trimmed_or_empty(self.location.as_deref()),
            due_date,
            recurrence,
            notes: trimmed_or_empty(self.notes.as_deref()),
        })
    }
}

fn trimmed_or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or("").to_string()
}

/// Derived task status. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Scheduled,
    Upcoming,
    Overdue,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::Upcoming => "upcoming",
            Status::Overdue => "overdue",
            Status::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Scheduled => "Scheduled",
            Status::Upcoming => "Upcoming",
            Status::Overdue => "Overdue",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(Status::Scheduled),
            "upcoming" => Ok(Status::Upcoming),
            "overdue" => Ok(Status::Overdue),
            "completed" => Ok(Status::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{s}': must be scheduled, upcoming, overdue, or completed"
            ))),
        }
    }
}

/// Status filter for the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}
