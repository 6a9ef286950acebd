//! homekeep export, import, and seed commands.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{load_context, GlobalOptions};
use crate::error::Result;
use crate::lock::write_atomic;
use crate::output::{emit_success, Report};
use crate::transfer::{self as codec, DEFAULT_EXPORT_FILE};

pub struct ExportOptions {
    pub output: Option<PathBuf>,
    pub globals: GlobalOptions,
}

pub struct ImportOptions {
    pub file: PathBuf,
    pub globals: GlobalOptions,
}

#[derive(Serialize)]
struct ExportOutput {
    path: String,
    count: usize,
}

#[derive(Serialize)]
struct ImportOutput {
    path: String,
    count: usize,
}

#[derive(Serialize)]
struct SeedOutput {
    seeded: bool,
    count: usize,
}

pub fn run_export(options: ExportOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let tasks = ctx.store.load();
    let payload = codec::export(&tasks)?;

    // Without --output the payload itself is the result.
    let Some(path) = options.output else {
        println!("{payload}");
        return Ok(());
    };

    let path = if path.is_dir() {
        path.join(DEFAULT_EXPORT_FILE)
    } else {
        path
    };
    write_atomic(&path, payload.as_bytes())?;
    tracing::info!(path = %path.display(), count = tasks.len(), "exported tasks");

    let output = ExportOutput {
        path: path.display().to_string(),
        count: tasks.len(),
    };
    let mut report = Report::new("Tasks exported");
    report.field("File", output.path.clone());
    report.field("Tasks", output.count.to_string());

    emit_success(options.globals.output(), "export", &output, &report)
}

pub fn run_import(options: ImportOptions) -> Result<()> {
    let ctx = load_context(&options.globals)?;
    let payload = std::fs::read_to_string(&options.file)?;
    let count = codec::import_into(&ctx.store, &payload, ctx.today)?;

    let output = ImportOutput {
        path: options.file.display().to_string(),
        count,
    };
    let mut report = Report::new("Tasks imported");
    report.field("File", output.path.clone());
    report.field("Tasks", count.to_string());
    report.warn("previous tasks were replaced");
    report.hint("homekeep dashboard");

    emit_success(options.globals.output(), "import", &output, &report)
}

pub fn run_seed(globals: GlobalOptions) -> Result<()> {
    let ctx = load_context(&globals)?;
    let seeded = ctx.store.seed(ctx.today)?;
    let count = ctx.store.load().len();

    let output = SeedOutput { seeded, count };
    let mut report = Report::new(if seeded {
        "Sample tasks added"
    } else {
        "Store already has tasks, nothing seeded"
    });
    report.field("Tasks", count.to_string());
    report.hint("homekeep dashboard");

    emit_success(globals.output(), "seed", &output, &report)
}
