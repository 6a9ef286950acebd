//! homekeep view commands: list, dashboard, calendar.

use serde::Serialize;

use crate::cli::{load_context, GlobalOptions};
use crate::dates;
use crate::error::{Error, Result};
use crate::output::{emit_success, Report};
use crate::query::{
    self, CalendarCell, CalendarCursor, CalendarDay, CalendarGrid, SortKey, TableQuery, TaskRow,
};
use crate::task::{Status, StatusFilter};

const SHORT_ID_LEN: usize = 10;

pub struct ListOptions {
    pub search: Option<String>,
    pub status: String,
    pub sort: Option<String>,
    pub globals: GlobalOptions,
}

pub struct CalendarOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub offset: i32,
    pub globals: GlobalOptions,
}

#[derive(Serialize)]
struct ListOutput {
    total: usize,
    tasks: Vec<TaskRow>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let sort = match options.sort.as_deref() {
        Some(value) => value.parse()?,
        None => ctx.config.sort_key().unwrap_or_default(),
    };
    let query = TableQuery {
        search: options.search.unwrap_or_default(),
        filter: options.status.parse::<StatusFilter>()?,
        sort,
    };

    let tasks = ctx.store.load();
    let rows = query::table(&tasks, &query, ctx.today, ctx.window_days());

    let mut report = Report::new(format!("{} of {} tasks", rows.len(), tasks.len()));
    if !query.search.trim().is_empty() {
        report.field("Search", query.search.trim());
    }
    if let StatusFilter::Only(status) = query.filter {
        report.field("Status", status.label());
    }
    report.field("Sorted by", sort_label(query.sort));
    let placeholder = if tasks.is_empty() { "No tasks yet." } else { "No tasks match." };
    report.block("Tasks", rows.iter().map(task_line), placeholder);
    if tasks.is_empty() {
        report.hint("homekeep add \"<name>\" --due YYYY-MM-DD");
        report.hint("homekeep seed");
    }

    let output = ListOutput {
        total: rows.len(),
        tasks: rows,
    };
    emit_success(options.globals.output(), "list", &output, &report)
}

fn sort_label(sort: SortKey) -> &'static str {
    match sort {
        SortKey::DueDate => "due date",
        SortKey::Name => "name",
        SortKey::Category => "category",
    }
}

pub fn run_dashboard(globals: GlobalOptions) -> Result<()> {
    let ctx = load_context(&globals)?;
    let tasks = ctx.store.load();
    let view = query::dashboard(&tasks, ctx.today, ctx.window_days());

    let mut report = Report::new(format!("Dashboard ({})", dates::format_short(ctx.today)));
    report.field("Total tasks", view.total.to_string());
    report.block(
        format!("Overdue ({})", view.overdue_count),
        view.overdue.iter().map(task_line),
        "No overdue tasks.",
    );
    report.block(
        format!("Upcoming ({})", view.upcoming_count),
        view.upcoming.iter().map(task_line),
        "No upcoming tasks. Add one!",
    );
    if view.total == 0 {
        report.hint("homekeep seed");
    }

    emit_success(globals.output(), "dashboard", &view, &report)
}

pub fn run_calendar(options: CalendarOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let current = CalendarCursor::containing(ctx.today);
    let month0 = match options.month {
        Some(month @ 1..=12) => month - 1,
        Some(month) => {
            return Err(Error::InvalidArgument(format!(
                "invalid month {month}: must be 1-12"
            )))
        }
        None => current.month0,
    };
    let cursor = CalendarCursor::new(options.year.unwrap_or(current.year), month0)?
        .shift(i64::from(options.offset))?;

    let tasks = ctx.store.load();
    let grid = query::calendar(
        &tasks,
        cursor,
        ctx.today,
        ctx.window_days(),
        ctx.config.calendar.max_visible,
    )?;

    let due: usize = grid.days().map(|day| day.tasks.len() + day.overflow).sum();
    let mut report = Report::new(grid.title.clone());
    report.field("Tasks due", due.to_string());
    report.block("", render_grid(&grid), "");
    report.block(
        "Due this month",
        grid.days()
            .filter(|day| !day.tasks.is_empty())
            .map(day_line),
        "Nothing due.",
    );

    emit_success(options.globals.output(), "calendar", &grid, &report)
}

fn day_line(day: &CalendarDay) -> String {
    let mut names: Vec<String> = day
        .tasks
        .iter()
        .map(|row| match row.status {
            Status::Overdue => format!("{} (overdue)", row.task.name),
            _ => row.task.name.clone(),
        })
        .collect();
    if day.overflow > 0 {
        names.push(format!("+{} more", day.overflow));
    }
    format!("{}: {}", dates::format_short(day.date), names.join(", "))
}

/// Text month grid: one row per week, `*` marks days with tasks, `[..]` today.
pub(crate) fn render_grid(grid: &CalendarGrid) -> Vec<String> {
    let mut lines = vec![grid.weekdays.iter().map(|day| format!("{day:>5}")).collect::<String>()];
    for week in grid.cells.chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Blank => "     ".to_string(),
                CalendarCell::Day(day) => {
                    let marker = if day.tasks.is_empty() { ' ' } else { '*' };
                    if day.is_today {
                        format!(" [{:>2}]", day.day)
                    } else {
                        format!("  {:>2}{}", day.day, marker)
                    }
                }
            })
            .collect();
        lines.push(line.trim_end().to_string());
    }
    lines
}

pub(crate) fn short_id(row: &TaskRow) -> &str {
    let id = row.task.id.as_str();
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// One-line task description used by list views.
pub(crate) fn task_line(row: &TaskRow) -> String {
    let task = &row.task;
    let mut line = format!(
        "[{}] {} {} ({}) due {}, {}",
        row.status,
        short_id(row),
        task.name,
        task.subtitle(),
        dates::format_short(task.due_date),
        task.recurrence.label()
    );
    if !task.notes.is_empty() {
        line.push_str(&format!(" - {}", task.notes));
    }
    line
}

pub(crate) fn task_fields(report: &mut Report, row: &TaskRow) {
    let task = &row.task;
    report.field("ID", task.id.as_str());
    report.field("Name", task.name.as_str());
    report.field("Category", task.category.as_str());
    if !task.location.is_empty() {
        report.field("Location", task.location.as_str());
    }
    report.field("Due", dates::format_short(task.due_date));
    report.field("Repeats", task.recurrence.label());
    report.field("Status", row.status.label());
    if let Some(last) = task.last_completed {
        report.field("Last done", dates::format_short(last));
    }
    if !task.notes.is_empty() {
        report.field("Notes", task.notes.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;
    use crate::task::{Recurrence, Task, TaskId};

    fn row() -> TaskRow {
        TaskRow {
            task: Task {
                id: TaskId::from("01j0abcdefghijk"),
                name: "Replace air filter".to_string(),
                category: "HVAC".to_string(),
                location: "Hallway".to_string(),
                due_date: parse_iso("2024-06-15").expect("date"),
                recurrence: Recurrence::every(90).expect("days"),
                notes: "20x20x1".to_string(),
                completed: false,
                last_completed: None,
            },
            status: Status::Upcoming,
        }
    }

    #[test]
    fn task_line_includes_status_and_schedule() {
        assert_eq!(
            task_line(&row()),
            "[upcoming] 01j0abcdef Replace air filter (HVAC \u{2022} Hallway) due Jun 15, 2024, Every 90 days - 20x20x1"
        );
    }

    #[test]
    fn grid_renders_one_line_per_week() {
        let today = parse_iso("2024-06-10").expect("today");
        let grid = query::calendar_default(
            &[row().task],
            CalendarCursor::containing(today),
            today,
        )
        .expect("grid");
        let lines = render_grid(&grid);
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("Mon"));
        assert!(lines.iter().any(|line| line.contains("[10]")));
        assert!(lines.iter().any(|line| line.contains("15*")));
    }

    #[test]
    fn day_line_marks_overdue_and_overflow() {
        let mut overdue = row();
        overdue.status = Status::Overdue;
        let day = CalendarDay {
            day: 15,
            date: parse_iso("2024-06-15").expect("date"),
            is_today: false,
            tasks: vec![overdue, row()],
            overflow: 2,
        };
        assert_eq!(
            day_line(&day),
            "Jun 15, 2024: Replace air filter (overdue), Replace air filter, +2 more"
        );
    }
}
