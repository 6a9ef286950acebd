//! homekeep - Household Maintenance Tracker Library
//!
//! This library provides the core functionality for the homekeep CLI tool:
//! recurring chores with due dates, derived status, and a monthly calendar.
//!
//! # Core Concepts
//!
//! - **Tasks**: Named chores with a due date and an optional recurrence in days
//! - **Status**: Scheduled, upcoming, overdue, or completed, derived from today
//! - **Completion**: Recurring tasks reschedule instead of closing
//! - **Store**: A JSON array on disk, written under a file lock
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `homekeep.toml`
//! - `dates`: Calendar-date helpers and the injectable clock
//! - `error`: Error types and result aliases
//! - `task`: Task record, recurrence, and status types
//! - `status`: Status classification
//! - `recurrence`: Completion and rescheduling
//! - `store`: Persistent task collection
//! - `form`: Create/edit dispatch for task drafts
//! - `query`: Dashboard, table, and calendar views
//! - `transfer`: JSON import and export
//! - `seed`: Sample tasks for an empty store
//! - `lock`: File locking and atomic writes

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod form;
pub mod lock;
pub mod output;
pub mod query;
pub mod recurrence;
pub mod seed;
pub mod status;
pub mod store;
pub mod task;
pub mod transfer;

pub use error::{Error, Result};
