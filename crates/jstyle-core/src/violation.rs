//! Violation and severity types.

use serde::{Deserialize, Serialize};

/// Severity level for reported violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the audit.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed; drives the exit status.
    Error,
}

impl Severity {
    /// Uppercase label used in the audit output format.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parses a lowercase severity name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One reported rule infraction.
///
/// Carries both the structured message identity (bundle, key, arguments) and
/// the rendered text, so listeners can format without another lookup while
/// tests assert on the structured fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// 1-based line.
    pub line: usize,
    /// 1-based column; absent for whole-line diagnostics.
    pub column: Option<usize>,
    /// Message bundle the key belongs to (e.g. `jstyle.checks.imports`).
    pub bundle: String,
    /// Message key within the bundle.
    pub key: String,
    /// Ordered substitution arguments.
    pub args: Vec<String>,
    /// Rendered message text.
    pub message: String,
    /// Name of the check that reported this violation.
    pub source_name: String,
    /// Severity of this violation.
    pub severity: Severity,
}

impl Violation {
    /// Sort key for the per-file ordering guarantee: (line, column)
    /// ascending; ties keep insertion order via stable sort.
    #[must_use]
    pub fn position_key(&self) -> (usize, usize) {
        (self.line, self.column.unwrap_or(0))
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity.label(), self.line)?;
        if let Some(col) = self.column {
            write!(f, ":{col}")?;
        }
        write!(f, ": {} [{}]", self.message, self.source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(line: usize, column: Option<usize>) -> Violation {
        Violation {
            line,
            column,
            bundle: "jstyle.checks.test".to_string(),
            key: "test.key".to_string(),
            args: vec![],
            message: "boom".to_string(),
            source_name: "TestCheck".to_string(),
            severity: Severity::Error,
        }
    }

    #[test]
    fn severity_ordering_puts_error_highest() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn position_key_treats_missing_column_as_zero() {
        assert!(make(4, None).position_key() < make(4, Some(1)).position_key());
        assert!(make(4, Some(9)).position_key() < make(5, None).position_key());
    }

    #[test]
    fn display_omits_absent_column() {
        let with = format!("{}", make(7, Some(3)));
        let without = format!("{}", make(7, None));
        assert!(with.contains("7:3: boom"));
        assert!(without.contains("7: boom"));
        assert!(!without.contains("7:0"));
    }
}
