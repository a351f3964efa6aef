//! Audit listeners: the sink side of the engine.
//!
//! The [`Checker`](crate::checker::Checker) emits lifecycle events in a
//! fixed order per file; listeners turn them into output. The
//! [`DefaultLogger`] renders the standard text format; the
//! [`CollectingListener`] buffers events for programmatic consumers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::CheckerError;
use crate::violation::Violation;

/// Receiver of audit lifecycle events.
///
/// Per file the engine calls `file_started`, then `add_error` for each
/// violation (sorted by position) or `add_exception` on failure, then
/// `file_finished`; the whole run is bracketed by `audit_started` and
/// `audit_finished`.
pub trait AuditListener {
    /// The audit is about to process its first file.
    fn audit_started(&mut self) {}

    /// A file's traversal is starting.
    fn file_started(&mut self, path: &Path) {
        let _ = path;
    }

    /// One violation, already sorted into position order.
    fn add_error(&mut self, path: &Path, violation: &Violation) {
        let _ = (path, violation);
    }

    /// A per-file failure (syntax error or check failure).
    fn add_exception(&mut self, path: &Path, error: &CheckerError) {
        let _ = (path, error);
    }

    /// A file's traversal is complete.
    fn file_finished(&mut self, path: &Path) {
        let _ = path;
    }

    /// The audit is complete; sinks flush here.
    fn audit_finished(&mut self) {}
}

/// Where a logger writes.
///
/// An owned file is closed when the sink drops, on every exit path. The
/// shared standard-output stream is flushed but left open.
pub enum OutputSink {
    /// The process-wide standard output stream.
    Stdout,
    /// An owned file, buffered.
    File(BufWriter<File>),
}

impl OutputSink {
    /// Opens an owned file sink.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be created.
    pub fn file(path: &Path) -> io::Result<Self> {
        Ok(Self::File(BufWriter::new(File::create(path)?)))
    }

    /// Writes one line, logging rather than failing on I/O errors.
    pub fn write_line(&mut self, line: &str) {
        let outcome = match self {
            Self::Stdout => writeln!(io::stdout(), "{line}"),
            Self::File(w) => writeln!(w, "{line}"),
        };
        if let Err(e) = outcome {
            warn!("audit output write failed: {e}");
        }
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) {
        let outcome = match self {
            Self::Stdout => io::stdout().flush(),
            Self::File(w) => w.flush(),
        };
        if let Err(e) = outcome {
            warn!("audit output flush failed: {e}");
        }
    }
}

/// Renders the standard text format:
/// `[SEVERITY] <path>:<line>[:<column>]: <message> [<CheckName>]`.
pub struct DefaultLogger {
    sink: OutputSink,
}

impl DefaultLogger {
    /// Creates a logger writing to the given sink.
    #[must_use]
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }

    /// Formats one violation line.
    #[must_use]
    pub fn format_violation(path: &Path, violation: &Violation) -> String {
        let mut line = format!(
            "[{}] {}:{}",
            violation.severity.label(),
            path.display(),
            violation.line
        );
        if let Some(col) = violation.column {
            line.push_str(&format!(":{col}"));
        }
        line.push_str(&format!(": {} [{}]", violation.message, violation.source_name));
        line
    }
}

impl AuditListener for DefaultLogger {
    fn audit_started(&mut self) {
        self.sink.write_line("Starting audit...");
    }

    fn add_error(&mut self, path: &Path, violation: &Violation) {
        let line = Self::format_violation(path, violation);
        self.sink.write_line(&line);
    }

    fn add_exception(&mut self, path: &Path, error: &CheckerError) {
        self.sink
            .write_line(&format!("[ERROR] {}: {error}", path.display()));
    }

    fn audit_finished(&mut self) {
        self.sink.write_line("Audit done.");
        self.sink.flush();
    }
}

/// Buffers every event for programmatic consumers (JSON output, the
/// suppression generator, tests).
#[derive(Default)]
pub struct CollectingListener {
    /// Event names in arrival order (`audit_started`, `file_started`, ...).
    pub events: Vec<String>,
    /// Violations with the file they were reported against.
    pub violations: Vec<(PathBuf, Violation)>,
    /// Rendered per-file exceptions.
    pub exceptions: Vec<(PathBuf, String)>,
}

impl CollectingListener {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditListener for CollectingListener {
    fn audit_started(&mut self) {
        self.events.push("audit_started".to_string());
    }

    fn file_started(&mut self, path: &Path) {
        self.events.push(format!("file_started:{}", path.display()));
    }

    fn add_error(&mut self, path: &Path, violation: &Violation) {
        self.events.push(format!("add_error:{}", violation.line));
        self.violations.push((path.to_path_buf(), violation.clone()));
    }

    fn add_exception(&mut self, path: &Path, error: &CheckerError) {
        self.events.push("add_exception".to_string());
        self.exceptions.push((path.to_path_buf(), error.to_string()));
    }

    fn file_finished(&mut self, path: &Path) {
        self.events.push(format!("file_finished:{}", path.display()));
    }

    fn audit_finished(&mut self) {
        self.events.push("audit_finished".to_string());
    }
}
