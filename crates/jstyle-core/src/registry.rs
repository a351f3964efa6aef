//! Static check registry: resolves configured module names to factories.
//!
//! Resolution tries an ordered list of package prefixes, with and without
//! the conventional `Check` suffix, so configurations may say
//! `ImportOrder`, `ImportOrderCheck`, or the fully-qualified
//! `jstyle.checks.ImportOrderCheck` interchangeably. Failures list every
//! candidate that was attempted.

use std::collections::BTreeMap;

use tracing::debug;

use crate::check::CheckBox;
use crate::config::CheckConfig;
use crate::error::{ConfigCause, ConfigError};

/// Factory producing a fresh check instance.
pub type CheckFactory = Box<dyn Fn() -> CheckBox + Send + Sync>;

/// Name of the dispatcher module that hosts tree checks.
pub const TREE_WALKER: &str = "TreeWalker";

/// Name of the root audit module.
pub const CHECKER: &str = "Checker";

/// Registry mapping fully-qualified check names to factories.
#[derive(Default)]
pub struct CheckRegistry {
    factories: BTreeMap<String, CheckFactory>,
    prefixes: Vec<String>,
}

impl CheckRegistry {
    /// Creates a registry with the built-in prefix search order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            prefixes: vec![String::new(), "jstyle.checks.".to_string()],
        }
    }

    /// Appends an additional package prefix to the search order.
    pub fn add_prefix(&mut self, prefix: &str) {
        self.prefixes.push(prefix.to_string());
    }

    /// Registers a factory under its fully-qualified name.
    pub fn register(
        &mut self,
        qualified_name: &str,
        factory: impl Fn() -> CheckBox + Send + Sync + 'static,
    ) {
        debug!("registering check {qualified_name}");
        self.factories
            .insert(qualified_name.to_string(), Box::new(factory));
    }

    /// Returns the registered fully-qualified names, sorted.
    #[must_use]
    pub fn registered_names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Every fully-qualified candidate tried for `name`, in order.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        for prefix in &self.prefixes {
            for suffix in ["", "Check"] {
                let candidate = format!("{prefix}{name}{suffix}");
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// Resolves a configured name and constructs a fresh instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigCause::UnknownModule`] listing every attempted
    /// fully-qualified candidate when none resolves.
    pub fn create(&self, name: &str) -> Result<CheckBox, ConfigError> {
        let attempted = self.candidates(name);
        for candidate in &attempted {
            if let Some(factory) = self.factories.get(candidate) {
                return Ok(factory());
            }
        }
        Err(ConfigError::new(ConfigCause::UnknownModule {
            name: name.to_string(),
            attempted,
        }))
    }

    /// Returns true when `name` resolves to a registered check.
    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.candidates(name)
            .iter()
            .any(|c| self.factories.contains_key(c))
    }

    /// Validates the nested-module allow-list for a whole configuration.
    ///
    /// The root must be `Checker`; its children must be `TreeWalker`
    /// instances; `TreeWalker` children must resolve to registered checks
    /// and may not nest further. In particular no module may contain
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigCause::DisallowedChild`] for the first combination
    /// off the allow-list, before any traversal begins.
    pub fn validate_nesting(&self, root: &CheckConfig) -> Result<(), ConfigError> {
        if root.name() != CHECKER {
            return Err(ConfigError::new(ConfigCause::Invalid(format!(
                "root module must be {CHECKER}, found '{}'",
                root.name()
            ))));
        }
        for walker in root.children() {
            if walker.name() != TREE_WALKER {
                return Err(ConfigError::new(ConfigCause::DisallowedChild {
                    parent: CHECKER.to_string(),
                    child: walker.name().to_string(),
                })
                .in_module(CHECKER));
            }
            for check in walker.children() {
                if check.name() == TREE_WALKER || !self.is_known(check.name()) {
                    return Err(ConfigError::new(ConfigCause::DisallowedChild {
                        parent: TREE_WALKER.to_string(),
                        child: check.name().to_string(),
                    })
                    .in_module(CHECKER)
                    .in_module(TREE_WALKER));
                }
                if let Some(grandchild) = check.children().first() {
                    return Err(ConfigError::new(ConfigCause::DisallowedChild {
                        parent: check.name().to_string(),
                        child: grandchild.name().to_string(),
                    })
                    .in_module(CHECKER)
                    .in_module(TREE_WALKER));
                }
            }
        }
        Ok(())
    }
}
