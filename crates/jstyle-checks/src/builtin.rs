//! Built-in check factory table.

use jstyle_core::CheckRegistry;

use crate::{ClassFanOut, ImportOrder, MagicNumber};

/// Registers every built-in check under its fully-qualified name.
pub fn register_builtins(registry: &mut CheckRegistry) {
    registry.register("jstyle.checks.ImportOrderCheck", || {
        Box::new(ImportOrder::new())
    });
    registry.register("jstyle.checks.MagicNumberCheck", || {
        Box::new(MagicNumber::new())
    });
    registry.register("jstyle.checks.ClassFanOutCheck", || {
        Box::new(ClassFanOut::new())
    });
}

/// Returns a registry pre-loaded with the built-in checks.
#[must_use]
pub fn default_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    register_builtins(&mut registry);
    registry
}
