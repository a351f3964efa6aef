//! Check command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use jstyle_checks::default_registry;
use jstyle_core::{config, Checker, DefaultLogger, OutputSink};

use crate::OutputFormat;
use super::output::{CompactLogger, JsonLogger};

/// Runs the check command; returns the process exit code.
pub fn run(
    config_path: &Path,
    files: &[PathBuf],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<i32> {
    let root = config::from_file(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let registry = default_registry();
    let mut checker = Checker::from_config(&root, &registry).context("configuration rejected")?;

    tracing::info!(
        "auditing {} file(s) with {} check(s)",
        files.len(),
        checker.module_count()
    );

    let sink = match output {
        Some(path) => OutputSink::file(path)
            .with_context(|| format!("cannot open output file {}", path.display()))?,
        None => OutputSink::Stdout,
    };
    match format {
        OutputFormat::Text => checker.add_listener(Box::new(DefaultLogger::new(sink))),
        OutputFormat::Json => checker.add_listener(Box::new(JsonLogger::new(sink))),
        OutputFormat::Compact => checker.add_listener(Box::new(CompactLogger::new(sink))),
    }

    // The diagnostic format names absolute paths.
    let files: Vec<PathBuf> = files
        .iter()
        .map(|f| std::fs::canonicalize(f).unwrap_or_else(|_| f.clone()))
        .collect();

    let result = checker.process(&files).context("audit aborted")?;
    Ok(result.exit_code())
}
