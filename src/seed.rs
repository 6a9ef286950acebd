//! Illustrative tasks for a fresh store.

use chrono::NaiveDate;

use crate::dates;
use crate::task::{Recurrence, Task, TaskId};

struct Sample {
    name: &'static str,
    category: &'static str,
    location: &'static str,
    due_offset_days: i64,
    every_days: u32,
    notes: &'static str,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        name: "Replace air filter",
        category: "HVAC",
        location: "Hallway",
        due_offset_days: 5,
        every_days: 90,
        notes: "20x20x1",
    },
    Sample {
        name: "Test smoke/CO detectors",
        category: "Safety",
        location: "Bedrooms",
        due_offset_days: -3,
        every_days: 30,
        notes: "Press test button",
    },
    Sample {
        name: "Clean fridge water filter",
        category: "Appliances",
        location: "Kitchen",
        due_offset_days: 12,
        every_days: 180,
        notes: "Check model number",
    },
    Sample {
        name: "Trash pickup",
        category: "Trash",
        location: "Front",
        due_offset_days: 2,
        every_days: 30,
        notes: "Put bins out night before",
    },
];

/// Sample tasks with due dates relative to `today`.
pub fn sample_tasks(today: NaiveDate) -> Vec<Task> {
    SAMPLES
        .iter()
        .map(|sample| Task {
            id: TaskId::generate(),
            name: sample.name.to_string(),
            category: sample.category.to_string(),
            location: sample.location.to_string(),
            due_date: dates::add_days(today, sample.due_offset_days),
            recurrence: Recurrence::every(sample.every_days).unwrap_or_default(),
            notes: sample.notes.to_string(),
            completed: false,
            last_completed: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;
    use crate::status::classify;
    use crate::task::Status;

    #[test]
    fn samples_cover_overdue_and_upcoming() {
        let today = parse_iso("2024-06-10").expect("today");
        let tasks = sample_tasks(today);
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(|task| task.recurrence.is_recurring()));
        assert!(tasks.iter().all(|task| !task.completed));

        let overdue = tasks
            .iter()
            .filter(|task| classify(task, today) == Status::Overdue)
            .count();
        assert_eq!(overdue, 1);
        assert_eq!(tasks[1].due_date, parse_iso("2024-06-07").expect("date"));
    }

    #[test]
    fn sample_ids_are_unique() {
        let tasks = sample_tasks(parse_iso("2024-06-10").expect("today"));
        let mut ids: Vec<_> = tasks.iter().map(|task| task.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tasks.len());
    }
}
