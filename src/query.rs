//! Derived views over the task collection.
//!
//! Every projection is a pure function of `(tasks, today, parameters)`:
//! - [`dashboard`]: upcoming/overdue buckets and counts
//! - [`table`]: searched, filtered, and sorted rows
//! - [`calendar`]: a 6x7 month grid with per-day task buckets

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dates;
use crate::error::{Error, Result};
use crate::status::{classify_within, DEFAULT_UPCOMING_WINDOW_DAYS};
use crate::task::{Status, StatusFilter, Task};

/// Cells in a calendar grid (6 weeks of 7 days).
pub const CALENDAR_CELLS: usize = 42;

/// Tasks shown per calendar day before collapsing into an overflow count.
pub const DEFAULT_CALENDAR_MAX_VISIBLE: usize = 3;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A task with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub status: Status,
}

impl TaskRow {
    fn new(task: &Task, today: NaiveDate, window_days: i64) -> Self {
        Self {
            task: task.clone(),
            status: classify_within(task, today, window_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub upcoming: Vec<TaskRow>,
    pub overdue: Vec<TaskRow>,
    pub upcoming_count: usize,
    pub overdue_count: usize,
    pub total: usize,
}

pub fn dashboard(tasks: &[Task], today: NaiveDate, window_days: i64) -> Dashboard {
    let mut upcoming = Vec::new();
    let mut overdue = Vec::new();
    for task in tasks.iter().filter(|task| !task.completed) {
        let row = TaskRow::new(task, today, window_days);
        match row.status {
            Status::Upcoming => upcoming.push(row),
            Status::Overdue => overdue.push(row),
            _ => {}
        }
    }
    upcoming.sort_by_key(|row| row.task.due_date);
    overdue.sort_by_key(|row| row.task.due_date);

    Dashboard {
        upcoming_count: upcoming.len(),
        overdue_count: overdue.len(),
        upcoming,
        overdue,
        total: tasks.len(),
    }
}

/// Task table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    DueDate,
    /// Case-insensitive text order; not locale-aware collation.
    Name,
    Category,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "duedate" | "due" | "due_date" | "due-date" => Ok(SortKey::DueDate),
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort '{s}': must be dueDate, name, or category"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    pub filter: StatusFilter,
    pub sort: SortKey,
}

/// Search, then filter by status, then sort. Sorting never drops rows.
pub fn table(tasks: &[Task], query: &TableQuery, today: NaiveDate, window_days: i64) -> Vec<TaskRow> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<TaskRow> = tasks
        .iter()
        .filter(|task| {
            needle.is_empty()
                || task
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .map(|task| TaskRow::new(task, today, window_days))
        .filter(|row| query.filter.matches(row.status))
        .collect();

    rows.sort_by(|left, right| match query.sort {
        SortKey::DueDate => left.task.due_date.cmp(&right.task.due_date),
        SortKey::Name => collate(&left.task.name, &right.task.name),
        SortKey::Category => collate(&left.task.category, &right.task.category),
    });
    rows
}

/// Case-insensitive ordering with a deterministic tie-break on the raw text.
fn collate(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Displayed month. `month0` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCursor {
    pub year: i32,
    pub month0: u32,
}

impl CalendarCursor {
    pub fn new(year: i32, month0: u32) -> Result<Self> {
        if month0 > 11 {
            return Err(Error::InvalidArgument(format!(
                "invalid month {}: must be 1-12",
                month0 + 1
            )));
        }
        Ok(Self { year, month0 })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn prev(self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    /// Move by `months` (negative for earlier) in one step.
    pub fn shift(self, months: i64) -> Result<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month0);
        let out_of_range = || {
            Error::InvalidArgument(format!("calendar offset {months} is out of range"))
        };
        let target = index.checked_add(months).ok_or_else(out_of_range)?;
        let year = i32::try_from(target.div_euclid(12)).map_err(|_| out_of_range())?;
        Ok(Self {
            year,
            month0: target.rem_euclid(12) as u32,
        })
    }

    pub fn next(self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub tasks: Vec<TaskRow>,
    pub overflow: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Blank,
    Day(CalendarDay),
}

impl CalendarCell {
    pub fn as_day(&self) -> Option<&CalendarDay> {
        match self {
            CalendarCell::Blank => None,
            CalendarCell::Day(day) => Some(day),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub month0: u32,
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.cells.iter().filter_map(CalendarCell::as_day)
    }
}

/// Month grid starting on the Monday on or before the 1st. In-month cells
/// carry the active tasks due that day, sorted by name.
pub fn calendar(
    tasks: &[Task],
    cursor: CalendarCursor,
    today: NaiveDate,
    window_days: i64,
    max_visible: usize,
) -> Result<CalendarGrid> {
    let first = NaiveDate::from_ymd_opt(cursor.year, cursor.month0 + 1, 1).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "invalid calendar month {}-{:02}",
            cursor.year,
            cursor.month0 + 1
        ))
    })?;
    let start_col = first.weekday().num_days_from_monday() as usize;
    let days_in_month = days_in_month(first);

    let mut cells = Vec::with_capacity(CALENDAR_CELLS);
    for index in 0..CALENDAR_CELLS {
        let day_number = index as i64 - start_col as i64 + 1;
        if day_number < 1 || day_number > i64::from(days_in_month) {
            cells.push(CalendarCell::Blank);
            continue;
        }

        let date = dates::add_days(first, day_number - 1);
        let mut due: Vec<&Task> = tasks
            .iter()
            .filter(|task| !task.completed && task.due_date == date)
            .collect();
        due.sort_by(|left, right| collate(&left.name, &right.name));

        let overflow = due.len().saturating_sub(max_visible);
        let visible = due
            .into_iter()
            .take(max_visible)
            .map(|task| TaskRow::new(task, today, window_days))
            .collect();

        cells.push(CalendarCell::Day(CalendarDay {
            day: date.day(),
            date,
            is_today: date == today,
            tasks: visible,
            overflow,
        }));
    }

    Ok(CalendarGrid {
        year: cursor.year,
        month0: cursor.month0,
        title: dates::format_month(cursor.year, cursor.month0),
        weekdays: WEEKDAYS,
        cells,
    })
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next = CalendarCursor::containing(first).next();
    NaiveDate::from_ymd_opt(next.year, next.month0 + 1, 1)
        .and_then(|next_first| next_first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Calendar with the default window and visible-task limit.
pub fn calendar_default(tasks: &[Task], cursor: CalendarCursor, today: NaiveDate) -> Result<CalendarGrid> {
    calendar(
        tasks,
        cursor,
        today,
        DEFAULT_UPCOMING_WINDOW_DAYS,
        DEFAULT_CALENDAR_MAX_VISIBLE,
    )
}
