//! Check configuration: the immutable tree of module names, properties, and
//! nested modules that drives an audit run.
//!
//! Split into a serde DTO layer ([`dto`]) that exists purely for
//! deserialization, and a loader that converts it into the validated
//! [`CheckConfig`] domain type.

mod dto;
mod loader;

pub use loader::{from_file, from_str};

use std::collections::BTreeMap;

/// One configured module: a name, its properties, and nested child modules.
///
/// Parsed once at startup and immutable thereafter. Nested children are
/// validated against the registry's allow-list before any traversal begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    name: String,
    properties: BTreeMap<String, String>,
    children: Vec<CheckConfig>,
}

impl CheckConfig {
    /// Creates an empty configuration for the named module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds a property (builder style).
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Appends a nested child module (builder style).
    #[must_use]
    pub fn with_child(mut self, child: CheckConfig) -> Self {
        self.children.push(child);
        self
    }

    /// The configured module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Property name to raw string value.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Nested child configurations, in declaration order.
    #[must_use]
    pub fn children(&self) -> &[CheckConfig] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_child_order() {
        let config = CheckConfig::new("TreeWalker")
            .with_child(CheckConfig::new("First"))
            .with_child(CheckConfig::new("Second"));
        let names: Vec<&str> = config.children().iter().map(CheckConfig::name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
