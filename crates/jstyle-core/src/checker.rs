//! Audit driver: runs the configured checks over a set of files and emits
//! listener events in the contract order.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::CheckConfig;
use crate::error::{CheckerError, ConfigError};
use crate::listener::AuditListener;
use crate::parser::{parse, ParseOptions};
use crate::registry::{CheckRegistry, TREE_WALKER};
use crate::violation::Severity;
use crate::walker::TreeWalker;

/// Aggregate outcome of one audit run.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditResult {
    /// Number of files that completed traversal.
    pub files_checked: usize,
    /// Count of error-severity violations.
    pub errors: usize,
    /// Count of warning-severity violations.
    pub warnings: usize,
    /// Count of info-severity violations.
    pub infos: usize,
    /// Number of per-file exceptions (syntax or check failures).
    pub exceptions: usize,
}

impl AuditResult {
    /// Process exit status: the error-severity count, capped so the
    /// distinct configuration/I-O failure code stays unambiguous.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.errors.min(250)).unwrap_or(250)
    }
}

/// Drives a full audit: per-file parse, dispatch, violation ordering, and
/// listener events, with destroy-exactly-once teardown.
pub struct Checker {
    walker: TreeWalker,
    listeners: Vec<Box<dyn AuditListener>>,
    parse_options: ParseOptions,
    destroyed: bool,
}

impl Checker {
    /// Builds a checker from a validated root configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the nesting allow-list is violated or
    /// any child module fails to load; nothing is traversed in that case.
    pub fn from_config(
        config: &CheckConfig,
        registry: &CheckRegistry,
    ) -> Result<Self, ConfigError> {
        registry.validate_nesting(config)?;

        let walker = match config
            .children()
            .iter()
            .find(|c| c.name() == TREE_WALKER)
        {
            Some(walker_config) => TreeWalker::from_config(walker_config, registry)?,
            None => TreeWalker::empty(),
        };

        Ok(Self {
            walker,
            listeners: Vec::new(),
            parse_options: ParseOptions::default(),
            destroyed: false,
        })
    }

    /// Attaches an audit listener.
    pub fn add_listener(&mut self, listener: Box<dyn AuditListener>) {
        self.listeners.push(listener);
    }

    /// Overrides the parse options used for every file.
    pub fn set_parse_options(&mut self, options: ParseOptions) {
        self.parse_options = options;
    }

    /// Number of loaded check modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.walker.module_count()
    }

    /// Names of the loaded checks, in configuration order.
    #[must_use]
    pub fn check_names(&self) -> Vec<&'static str> {
        self.walker.check_names()
    }

    /// Processes every file, emitting listener events as it goes.
    ///
    /// Individual file failures (syntax errors, check failures) are
    /// reported through `add_exception` and do not stop the run. I/O
    /// failures abort the run; destroy hooks still fire exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::Io`] when a target file cannot be read.
    pub fn process(&mut self, files: &[PathBuf]) -> Result<AuditResult, CheckerError> {
        let outcome = self.run(files);
        if outcome.is_err() {
            // Run-level abort: modules still get their destroy hook.
            self.destroy();
        }
        outcome
    }

    fn run(&mut self, files: &[PathBuf]) -> Result<AuditResult, CheckerError> {
        info!("starting audit over {} file(s)", files.len());
        let mut result = AuditResult::default();

        for listener in &mut self.listeners {
            listener.audit_started();
        }

        for path in files {
            self.process_file(path, &mut result)?;
        }

        for listener in &mut self.listeners {
            listener.audit_finished();
        }
        self.destroy();

        info!(
            "audit complete: {} error(s), {} warning(s) in {} file(s)",
            result.errors, result.warnings, result.files_checked
        );
        Ok(result)
    }

    fn process_file(&mut self, path: &Path, result: &mut AuditResult) -> Result<(), CheckerError> {
        debug!("processing {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|e| CheckerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        for listener in &mut self.listeners {
            listener.file_started(path);
        }

        match self.audit_source(path, &source, result) {
            Ok(()) => {}
            Err(err @ (CheckerError::Syntax { .. } | CheckerError::CheckFailure { .. })) => {
                result.exceptions += 1;
                for listener in &mut self.listeners {
                    listener.add_exception(path, &err);
                }
            }
            Err(other) => return Err(other),
        }

        for listener in &mut self.listeners {
            listener.file_finished(path);
        }
        Ok(())
    }

    fn audit_source(
        &mut self,
        path: &Path,
        source: &str,
        result: &mut AuditResult,
    ) -> Result<(), CheckerError> {
        let tree = parse(source, self.parse_options).map_err(|e| CheckerError::Syntax {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut violations = self.walker.process(path, source, &tree)?;
        // Contract: non-decreasing (line, column); stable sort keeps
        // insertion order for ties.
        violations.sort_by_key(crate::violation::Violation::position_key);

        for violation in &violations {
            match violation.severity {
                Severity::Error => result.errors += 1,
                Severity::Warning => result.warnings += 1,
                Severity::Info => result.infos += 1,
            }
            for listener in &mut self.listeners {
                listener.add_error(path, violation);
            }
        }
        result.files_checked += 1;
        Ok(())
    }

    /// Runs every module's destroy hook. Idempotent: the hooks fire exactly
    /// once no matter how the run ended.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            self.walker.destroy();
            self.destroyed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_matches_error_count() {
        let result = AuditResult {
            errors: 2,
            ..AuditResult::default()
        };
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn exit_code_distinguishes_zero_one_and_two() {
        for (errors, code) in [(0, 0), (1, 1), (2, 2)] {
            let result = AuditResult {
                errors,
                ..AuditResult::default()
            };
            assert_eq!(result.exit_code(), code);
        }
    }

    #[test]
    fn exit_code_is_capped() {
        let result = AuditResult {
            errors: 100_000,
            ..AuditResult::default()
        };
        assert_eq!(result.exit_code(), 250);
    }
}
