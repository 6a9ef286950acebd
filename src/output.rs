//! Command results for people and for scripts.
//!
//! Every command builds a [`Report`] for the terminal and hands a serializable
//! payload to [`emit_success`]. With `--json` only the payload is printed,
//! wrapped in a versioned envelope:
//!
//! ```text
//! {"schema_version": "homekeep.v1", "command": "list", "status": "success", "data": {...}}
//! ```

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "homekeep.v1";

/// Global flags that take a value, skipped when naming the command.
const VALUE_FLAGS: [&str; 3] = ["--store", "--today", "--config"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text result of one command: a title, labelled fields, titled blocks
/// of lines (task lists, the month grid), then warnings and hints.
#[derive(Debug, Clone, Default)]
pub struct Report {
    title: String,
    fields: Vec<(&'static str, String)>,
    blocks: Vec<Block>,
    warnings: Vec<String>,
    hints: Vec<String>,
}

#[derive(Debug, Clone)]
struct Block {
    heading: String,
    lines: Vec<String>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(&mut self, label: &'static str, value: impl Into<String>) {
        self.fields.push((label, value.into()));
    }

    /// Add a titled block. An empty block prints `placeholder` instead.
    pub fn block<I>(&mut self, heading: impl Into<String>, lines: I, placeholder: &str)
    where
        I: IntoIterator<Item = String>,
    {
        let mut lines: Vec<String> = lines.into_iter().collect();
        if lines.is_empty() && !placeholder.is_empty() {
            lines.push(placeholder.to_string());
        }
        self.blocks.push(Block {
            heading: heading.into(),
            lines,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn hint(&mut self, command: impl Into<String>) {
        self.hints.push(command.into());
    }

    pub fn render(&self) -> String {
        let mut out = self.title.clone();
        for (label, value) in &self.fields {
            out.push_str(&format!("\n  {label}: {value}"));
        }
        for block in &self.blocks {
            out.push_str(&format!("\n\n{}", block.heading));
            for line in &block.lines {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }
        if !self.warnings.is_empty() || !self.hints.is_empty() {
            out.push('\n');
        }
        for warning in &self.warnings {
            out.push_str(&format!("\nwarning: {warning}"));
        }
        for hint in &self.hints {
            out.push_str(&format!("\nhint: {hint}"));
        }
        out
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Success,
    Error,
}

#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Outcome,
    #[serde(flatten)]
    body: B,
}

#[derive(Serialize)]
struct SuccessBody<'a, T: Serialize> {
    data: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hints: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hints: Vec<String>,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn print_envelope<B: Serialize>(command: &str, status: Outcome, body: B) -> Result<()> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        status,
        body,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &Report,
) -> Result<()> {
    if options.json {
        let body = SuccessBody {
            data,
            warnings: report.warnings.clone(),
            hints: report.hints.clone(),
        };
        return print_envelope(command, Outcome::Success, body);
    }
    if !options.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        let body = ErrorBody {
            error: ErrorDetail {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            hints,
        };
        return print_envelope(command, Outcome::Error, body);
    }

    eprintln!("error: {err}");
    for hint in hints {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

/// First positional argument, skipping global flags and their values.
pub fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    "homekeep".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_hints(err: &Error) -> Vec<String> {
    let hint = match err {
        Error::TaskNotFound(_) => "homekeep list",
        Error::InvalidFormat(_) => "import expects a JSON array of tasks, as written by `homekeep export`",
        Error::InvalidConfig(_) => "fix homekeep.toml then retry",
        Error::LockFailed(_) => "another homekeep process holds the store; retry",
        _ => return Vec::new(),
    };
    vec![hint.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn infer_command_skips_global_flags() {
        assert_eq!(infer_command_name(args(&["--json", "list"])), "list");
        assert_eq!(
            infer_command_name(args(&["--store", "/tmp/t.json", "--today", "2024-06-10", "done", "01a"])),
            "done"
        );
        assert_eq!(infer_command_name(args(&[])), "homekeep");
    }

    #[test]
    fn report_renders_fields_blocks_and_hints() {
        let mut report = Report::new("Dashboard (Jun 10, 2024)");
        report.field("Overdue", "1");
        report.block("Overdue", vec!["[overdue] Test detectors".to_string()], "none");
        report.block("Upcoming", Vec::new(), "No upcoming tasks.");
        report.warn("store was repaired");
        report.hint("homekeep list");

        assert_eq!(
            report.render(),
            "Dashboard (Jun 10, 2024)\n  Overdue: 1\n\n\
             Overdue\n  [overdue] Test detectors\n\n\
             Upcoming\n  No upcoming tasks.\n\n\
             warning: store was repaired\nhint: homekeep list"
        );
    }

    #[test]
    fn bare_report_is_just_the_title() {
        assert_eq!(Report::new("Task deleted").render(), "Task deleted");
    }

    #[test]
    fn errors_carry_hints_by_kind() {
        assert_eq!(
            error_hints(&Error::TaskNotFound("01a".to_string())),
            vec!["homekeep list".to_string()]
        );
        assert!(error_hints(&Error::InvalidArgument("x".to_string())).is_empty());
        assert_eq!(error_kind(&Error::InvalidFormat("x".to_string())), "user_error");
    }
}
