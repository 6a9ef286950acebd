//! Command-line interface for homekeep
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::dates::{self, Clock, FixedClock, SystemClock};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::store::{JsonFileBackend, TaskStore};

mod task;
mod transfer;
mod view;

/// homekeep - household maintenance tracker
///
/// Track recurring chores with due dates, see what is upcoming or overdue,
/// and browse a monthly calendar.
#[derive(Parser, Debug)]
#[command(name = "homekeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task store file
    #[arg(long, global = true, env = "HOMEKEEP_STORE")]
    pub store: Option<PathBuf>,

    /// Path to homekeep.toml
    #[arg(long, global = true, env = "HOMEKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "HOMEKEEP_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a maintenance task
    Add {
        /// Task name
        name: String,

        /// Category (default: Other)
        #[arg(long)]
        category: Option<String>,

        /// Where in the house
        #[arg(long)]
        location: Option<String>,

        /// Due date, YYYY-MM-DD (default: a week from today)
        #[arg(long)]
        due: Option<String>,

        /// Recurrence in days, or "none"
        #[arg(long, default_value = "none")]
        every: String,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Edit a task's details
    Edit {
        /// Task ID (or unique prefix)
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Recurrence in days, or "none"
        #[arg(long)]
        every: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Mark a task done (recurring tasks are rescheduled; done one-time tasks are reopened)
    Done {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Show one task
    Show {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// List tasks with search, status filter, and sort
    List {
        /// Case-insensitive text search over name, category, location, notes
        #[arg(short, long)]
        search: Option<String>,

        /// all, scheduled, upcoming, overdue, or completed
        #[arg(long, default_value = "all")]
        status: String,

        /// dueDate, name, or category (default from config)
        #[arg(long)]
        sort: Option<String>,
    },

    /// Upcoming and overdue summary
    Dashboard,

    /// Month calendar of active tasks
    Calendar {
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,

        /// Months to move from the selected month (negative for earlier)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },

    /// Export all tasks as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of a JSON export
    Import {
        /// JSON file to import
        file: PathBuf,
    },

    /// Add sample tasks if the store is empty
    Seed,
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

/// Resolved store, configuration, and reference date for one command.
pub(crate) struct Context {
    pub store: TaskStore<JsonFileBackend>,
    pub config: Config,
    pub today: NaiveDate,
}

impl Context {
    pub fn window_days(&self) -> i64 {
        self.config.status.upcoming_window_days
    }
}

pub(crate) fn load_context(globals: &GlobalOptions) -> Result<Context> {
    let config_path = globals.config.clone().or_else(config::default_config_path);
    let config = Config::load_or_default(config_path.as_deref());
    let store_path = globals.store.clone().unwrap_or_else(|| config.store_path());
    let today = match globals.today.as_deref() {
        Some(value) => FixedClock(dates::parse_iso_arg("today", value)?).today(),
        None => SystemClock.today(),
    };
    tracing::debug!(store = %store_path.display(), %today, "loaded context");

    Ok(Context {
        store: TaskStore::new(JsonFileBackend::new(store_path)).with_today(today),
        config,
        today,
    })
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = GlobalOptions {
            store: self.store,
            config: self.config,
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                name,
                category,
                location,
                due,
                every,
                notes,
            } => task::run_add(task::AddOptions {
                name,
                category,
                location,
                due,
                every,
                notes,
                globals,
            }),
            Commands::Edit {
                id,
                name,
                category,
                location,
                due,
                every,
                notes,
            } => task::run_edit(task::EditOptions {
                id,
                name,
                category,
                location,
                due,
                every,
                notes,
                globals,
            }),
            Commands::Done { id } => task::run_done(task::IdOptions { id, globals }),
            Commands::Rm { id } => task::run_rm(task::IdOptions { id, globals }),
            Commands::ClearCompleted => task::run_clear_completed(globals),
            Commands::Show { id } => task::run_show(task::IdOptions { id, globals }),
            Commands::List {
                search,
                status,
                sort,
            } => view::run_list(view::ListOptions {
                search,
                status,
                sort,
                globals,
            }),
            Commands::Dashboard => view::run_dashboard(globals),
            Commands::Calendar {
                year,
                month,
                offset,
            } => view::run_calendar(view::CalendarOptions {
                year,
                month,
                offset,
                globals,
            }),
            Commands::Export { output } => {
                transfer::run_export(transfer::ExportOptions { output, globals })
            }
            Commands::Import { file } => {
                transfer::run_import(transfer::ImportOptions { file, globals })
            }
            Commands::Seed => transfer::run_seed(globals),
        }
    }
}
