//! # jstyle-checks
//!
//! Built-in check modules for jstyle.
//!
//! | Name | Description |
//! |------|-------------|
//! | `ImportOrderCheck` | Import statements follow configured group ordering |
//! | `MagicNumberCheck` | Numeric literals outside constant definitions |
//! | `ClassFanOutCheck` | Number of distinct types a class depends on |
//!
//! ## Usage
//!
//! ```ignore
//! use jstyle_checks::default_registry;
//! use jstyle_core::{config, Checker};
//!
//! let registry = default_registry();
//! let config = config::from_file(Path::new("jstyle.toml"))?;
//! let checker = Checker::from_config(&config, &registry)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod class_fan_out;
mod import_order;
mod magic_number;

pub use builtin::{default_registry, register_builtins};
pub use class_fan_out::ClassFanOut;
pub use import_order::ImportOrder;
pub use magic_number::MagicNumber;

/// Re-export core types for convenience.
pub use jstyle_core::{Check, Severity, Violation};
