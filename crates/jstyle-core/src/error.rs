//! Error taxonomy for the audit pipeline.
//!
//! Load-time problems are [`ConfigError`]: fatal to the whole run before any
//! file is processed, carrying an ordered module-layer chain so callers can
//! distinguish configuration failures structurally instead of matching on
//! concatenated strings. Per-file problems surface as [`CheckerError`]
//! variants and never abort the other files.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;
use crate::tree::TokenKind;

/// Innermost cause of a configuration failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigCause {
    /// A property value could not be applied to a module.
    #[error("cannot set property '{name}' to '{value}': {message}")]
    Property {
        /// Offending property name.
        name: String,
        /// Raw value as configured.
        value: String,
        /// Underlying cause, e.g. the exact malformed token.
        message: String,
    },

    /// No factory matched the configured module name.
    #[error("unable to instantiate '{name}'; tried {}", .attempted.join(", "))]
    UnknownModule {
        /// Name as configured.
        name: String,
        /// Every fully-qualified candidate that was attempted, in order.
        attempted: Vec<String>,
    },

    /// A module declared a required token outside its acceptable set.
    #[error("required token {token} is not acceptable for check '{check}'")]
    TokenSubset {
        /// Offending check name.
        check: String,
        /// The token that broke the subset rule.
        token: TokenKind,
    },

    /// A nested module combination is not on the allow-list.
    #[error("module '{child}' is not allowed as a child of '{parent}'")]
    DisallowedChild {
        /// Parent module name.
        parent: String,
        /// Rejected child module name.
        child: String,
    },

    /// Any other structural problem with the configuration.
    #[error("{0}")]
    Invalid(String),
}

/// A load-time configuration failure with its module-layer chain.
///
/// `layers` lists the module path from the outermost container down to the
/// module that failed; rendering joins them as the familiar
/// `cannot initialize module X - cannot initialize module Y - <cause>` chain
/// while keeping every layer programmatically reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    layers: Vec<String>,
    cause: ConfigCause,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for layer in &self.layers {
            write!(f, "cannot initialize module {layer} - ")?;
        }
        write!(f, "{}", self.cause)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl ConfigError {
    /// Creates an error with no layers yet.
    #[must_use]
    pub fn new(cause: ConfigCause) -> Self {
        Self {
            layers: Vec::new(),
            cause,
        }
    }

    /// Prepends a module layer; the outermost wrapper calls this last.
    #[must_use]
    pub fn in_module(mut self, module: &str) -> Self {
        self.layers.insert(0, module.to_string());
        self
    }

    /// The module path, outermost first.
    #[must_use]
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// The innermost cause.
    #[must_use]
    pub fn cause(&self) -> &ConfigCause {
        &self.cause
    }
}

/// Failure to apply a property inside a check's `set_property`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PropertyError {
    /// The check does not know this property.
    #[error("unknown property '{name}'")]
    Unknown {
        /// Property name as configured.
        name: String,
    },

    /// The value could not be interpreted.
    #[error("{message}")]
    Invalid {
        /// Property name as configured.
        name: String,
        /// Raw value as configured.
        value: String,
        /// Description naming the exact malformed token.
        message: String,
    },
}

impl PropertyError {
    /// Wraps this failure into a configuration error attributed to `check`.
    #[must_use]
    pub fn into_config_error(self, check: &str) -> ConfigError {
        let cause = match self {
            Self::Unknown { name } => ConfigCause::Property {
                name,
                value: String::new(),
                message: "unknown property".to_string(),
            },
            Self::Invalid {
                name,
                value,
                message,
            } => ConfigCause::Property {
                name,
                value,
                message,
            },
        };
        ConfigError::new(cause).in_module(check)
    }
}

/// Errors raised while driving an audit.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Load-time configuration failure; fatal before any file is processed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Target file could not be read.
    #[error("unable to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Source was not well-formed; recoverable per file.
    #[error("syntax error in {path}: {source}")]
    Syntax {
        /// File that failed to parse.
        path: PathBuf,
        /// Position and description of the failure.
        source: ParseError,
    },

    /// A check raised an error mid-traversal; aborts that file only.
    #[error("check '{check}' failed on {path} at {line}:{column}: {message}")]
    CheckFailure {
        /// Check that raised the error.
        check: String,
        /// File being traversed.
        path: PathBuf,
        /// 1-based line of the node being visited.
        line: usize,
        /// 1-based column of the node being visited.
        column: usize,
        /// The check's own message.
        message: String,
    },
}
