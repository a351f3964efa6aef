//! Alternate output listeners for the check command.

use std::path::{Path, PathBuf};

use jstyle_core::{AuditListener, CheckerError, OutputSink, Violation};
use serde_json::json;

/// One-line-per-violation format without the audit bracket lines:
/// `<path>:<line>[:<column>]: <message> [<CheckName>]`.
pub struct CompactLogger {
    sink: OutputSink,
}

impl CompactLogger {
    /// Creates a compact logger writing to the given sink.
    #[must_use]
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }
}

impl AuditListener for CompactLogger {
    fn add_error(&mut self, path: &Path, violation: &Violation) {
        let mut line = format!("{}:{}", path.display(), violation.line);
        if let Some(col) = violation.column {
            line.push_str(&format!(":{col}"));
        }
        line.push_str(&format!(
            ": {} [{}]",
            violation.message, violation.source_name
        ));
        self.sink.write_line(&line);
    }

    fn add_exception(&mut self, path: &Path, error: &CheckerError) {
        self.sink
            .write_line(&format!("{}: {error}", path.display()));
    }

    fn audit_finished(&mut self) {
        self.sink.flush();
    }
}

/// Buffers the whole audit and emits one JSON document at the end.
pub struct JsonLogger {
    sink: OutputSink,
    violations: Vec<(PathBuf, Violation)>,
    exceptions: Vec<(PathBuf, String)>,
}

impl JsonLogger {
    /// Creates a JSON logger writing to the given sink.
    #[must_use]
    pub fn new(sink: OutputSink) -> Self {
        Self {
            sink,
            violations: Vec::new(),
            exceptions: Vec::new(),
        }
    }
}

impl AuditListener for JsonLogger {
    fn add_error(&mut self, path: &Path, violation: &Violation) {
        self.violations.push((path.to_path_buf(), violation.clone()));
    }

    fn add_exception(&mut self, path: &Path, error: &CheckerError) {
        self.exceptions.push((path.to_path_buf(), error.to_string()));
    }

    fn audit_finished(&mut self) {
        let violations: Vec<serde_json::Value> = self
            .violations
            .iter()
            .map(|(path, v)| {
                json!({
                    "path": path.display().to_string(),
                    "line": v.line,
                    "column": v.column,
                    "severity": v.severity,
                    "message": v.message,
                    "source": v.source_name,
                    "key": v.key,
                })
            })
            .collect();
        let exceptions: Vec<serde_json::Value> = self
            .exceptions
            .iter()
            .map(|(path, message)| {
                json!({
                    "path": path.display().to_string(),
                    "error": message,
                })
            })
            .collect();
        let document = json!({
            "violations": violations,
            "exceptions": exceptions,
        });
        match serde_json::to_string_pretty(&document) {
            Ok(rendered) => self.sink.write_line(&rendered),
            Err(e) => tracing::warn!("failed to serialize audit results: {e}"),
        }
        self.sink.flush();
    }
}
