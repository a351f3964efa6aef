//! The polymorphic contract every check module implements, and the
//! traversal-scoped context checks report through.

use std::path::Path;

use thiserror::Error;

use crate::error::PropertyError;
use crate::messages::{MessageBundle, EMPTY_BUNDLE};
use crate::tree::{NodeId, SyntaxTree, TokenKind};
use crate::violation::{Severity, Violation};

/// Error raised from inside a check callback.
///
/// The dispatcher wraps it with the node position and check name before it
/// leaves the traversal, so a bare message is all a check needs to supply.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CheckFailed(pub String);

/// Result type for check callbacks.
pub type CheckResult = Result<(), CheckFailed>;

/// A pluggable rule module that inspects the syntax tree.
///
/// One instance lives for the whole run and is reused across files; any
/// per-file state it keeps must be cleared in [`Check::begin_tree`]. All
/// reporting goes through the [`CheckContext`], which is created fresh for
/// every file's traversal.
pub trait Check: Send {
    /// Canonical check name used in diagnostics and suppressions.
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this check looks for.
    fn description(&self) -> &'static str {
        ""
    }

    /// Every token kind this check can be subscribed to.
    fn acceptable_tokens(&self) -> &'static [TokenKind];

    /// Token kinds this check cannot work without.
    ///
    /// Must be a subset of [`Check::acceptable_tokens`]; the dispatcher
    /// rejects the configuration at load time otherwise.
    fn required_tokens(&self) -> &'static [TokenKind] {
        &[]
    }

    /// Subscription used when the configuration does not narrow it.
    fn default_tokens(&self) -> &'static [TokenKind] {
        self.acceptable_tokens()
    }

    /// The message bundle this check renders violations from.
    fn messages(&self) -> MessageBundle {
        EMPTY_BUNDLE
    }

    /// Applies one configured property.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] naming the property and the exact
    /// malformed token when the value cannot be applied.
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        let _ = value;
        Err(PropertyError::Unknown {
            name: name.to_string(),
        })
    }

    /// Called once per file before traversal; resets per-file state.
    fn begin_tree(&mut self, ctx: &mut CheckContext<'_>, tree: &SyntaxTree) -> CheckResult {
        let _ = (ctx, tree);
        Ok(())
    }

    /// Called once per file after traversal completes.
    fn finish_tree(&mut self, ctx: &mut CheckContext<'_>, tree: &SyntaxTree) -> CheckResult {
        let _ = (ctx, tree);
        Ok(())
    }

    /// Called on node entry for every subscribed token kind.
    fn visit(&mut self, ctx: &mut CheckContext<'_>, tree: &SyntaxTree, node: NodeId) -> CheckResult {
        let _ = (ctx, tree, node);
        Ok(())
    }

    /// Called on node exit for every subscribed token kind.
    fn leave(&mut self, ctx: &mut CheckContext<'_>, tree: &SyntaxTree, node: NodeId) -> CheckResult {
        let _ = (ctx, tree, node);
        Ok(())
    }

    /// Called exactly once when the run tears down, even after an abort.
    fn destroy(&mut self) {}
}

/// Type alias for boxed check trait objects.
pub type CheckBox = Box<dyn Check>;

/// Traversal-scoped context handed into check callbacks.
///
/// Owns the violations collected during one file's traversal; the dispatcher
/// scopes each callback to the reporting identity of the module it is about
/// to invoke, so checks only ever supply position, key, and arguments.
pub struct CheckContext<'a> {
    path: &'a Path,
    source: &'a str,
    scope_name: &'static str,
    scope_severity: Severity,
    scope_bundle: MessageBundle,
    violations: Vec<Violation>,
}

impl<'a> CheckContext<'a> {
    /// Creates a context for one file's traversal.
    #[must_use]
    pub fn new(path: &'a Path, source: &'a str) -> Self {
        Self {
            path,
            source,
            scope_name: "",
            scope_severity: Severity::Error,
            scope_bundle: EMPTY_BUNDLE,
            violations: Vec::new(),
        }
    }

    /// Scopes subsequent reports to the given module identity.
    pub(crate) fn enter_module(
        &mut self,
        name: &'static str,
        severity: Severity,
        bundle: MessageBundle,
    ) {
        self.scope_name = name;
        self.scope_severity = severity;
        self.scope_bundle = bundle;
    }

    /// Path of the file under traversal.
    ///
    /// The returned reference borrows the traversal, not this context, so
    /// callers may keep it while reporting.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Full source text of the file under traversal.
    ///
    /// The returned reference borrows the traversal, not this context, so
    /// callers may keep derived slices while reporting.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Reports a violation at the given position.
    pub fn report(&mut self, line: usize, column: Option<usize>, key: &str, args: &[&str]) {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        let message = self.scope_bundle.render(key, &args);
        self.violations.push(Violation {
            line,
            column,
            bundle: self.scope_bundle.name.to_string(),
            key: key.to_string(),
            args,
            message,
            source_name: self.scope_name.to_string(),
            severity: self.scope_severity,
        });
    }

    /// Violations collected so far, in insertion order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Drains the collected violations.
    pub(crate) fn take_violations(&mut self) -> Vec<Violation> {
        std::mem::take(&mut self.violations)
    }
}
