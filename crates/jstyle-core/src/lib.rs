//! # jstyle-core
//!
//! Core engine for jstyle, a static-analysis tool for Java sources.
//!
//! The engine parses each file into a [`SyntaxTree`], dispatches one
//! depth-first traversal to the configured [`Check`] modules, and emits
//! ordered [`Violation`] diagnostics through [`AuditListener`] sinks. It
//! also hosts the auxiliary query modes (tree printing, path queries,
//! suppression generation) that operate on the same tree.
//!
//! ## Example
//!
//! ```ignore
//! use jstyle_core::{config, Checker, CheckRegistry, DefaultLogger, OutputSink};
//!
//! let config = config::from_file(Path::new("jstyle.toml"))?;
//! let mut checker = Checker::from_config(&config, &registry)?;
//! checker.add_listener(Box::new(DefaultLogger::new(OutputSink::Stdout)));
//! let result = checker.process(&files)?;
//! std::process::exit(result.exit_code());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast_printer;
mod check;
mod checker;
pub mod config;
mod error;
mod listener;
pub mod messages;
mod parser;
mod registry;
pub mod suppressions;
mod tree;
mod violation;
mod walker;
pub mod xpath;

pub use check::{Check, CheckBox, CheckContext, CheckFailed, CheckResult};
pub use checker::{AuditResult, Checker};
pub use config::CheckConfig;
pub use error::{CheckerError, ConfigCause, ConfigError, PropertyError};
pub use listener::{AuditListener, CollectingListener, DefaultLogger, OutputSink};
pub use messages::MessageBundle;
pub use parser::{parse, parse_javadoc, ParseError, ParseOptions};
pub use registry::{CheckFactory, CheckRegistry, CHECKER, TREE_WALKER};
pub use tree::{NodeId, SyntaxTree, TokenKind, TreeBuilder, ALL_TOKEN_KINDS};
pub use violation::{Severity, Violation};
pub use walker::TreeWalker;
