//! Tree-walking dispatcher: drives one traversal per file and fans node
//! events out to the subscribed checks.
//!
//! Modules are loaded once per run from the `TreeWalker` configuration
//! node. After loading, a token-kind to subscriber index is built once;
//! traversal never consults the registry again. Per file, every module gets
//! `begin_tree` (state reset) regardless of subscription, then a single
//! depth-first pass invokes `visit` at node entry and `leave` at node exit
//! for subscribed modules in configuration order, then `finish_tree`.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::check::{CheckBox, CheckContext};
use crate::config::CheckConfig;
use crate::error::{CheckerError, ConfigCause, ConfigError};
use crate::registry::{CheckRegistry, TREE_WALKER};
use crate::tree::{NodeId, SyntaxTree, TokenKind};
use crate::violation::{Severity, Violation};

struct LoadedModule {
    check: CheckBox,
    severity: Severity,
    tokens: Vec<TokenKind>,
}

/// Dispatcher that runs all configured tree checks over one file at a time.
pub struct TreeWalker {
    modules: Vec<LoadedModule>,
    subscriptions: BTreeMap<TokenKind, Vec<usize>>,
}

impl TreeWalker {
    /// A walker with no modules; every traversal is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
            subscriptions: BTreeMap::new(),
        }
    }

    /// Loads and configures every child check of a `TreeWalker` config node.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] with the full module-layer chain when a
    /// name does not resolve, a property cannot be applied, or a check's
    /// required tokens are not a subset of its acceptable tokens.
    pub fn from_config(
        config: &CheckConfig,
        registry: &CheckRegistry,
    ) -> Result<Self, ConfigError> {
        let mut modules = Vec::new();

        for child in config.children() {
            let mut check = registry
                .create(child.name())
                .map_err(|e| e.in_module(TREE_WALKER))?;
            let check_name = check.name();

            for token in check.required_tokens() {
                if !check.acceptable_tokens().contains(token) {
                    return Err(ConfigError::new(ConfigCause::TokenSubset {
                        check: check_name.to_string(),
                        token: *token,
                    })
                    .in_module(TREE_WALKER));
                }
            }

            let mut severity = Severity::Error;
            let mut token_override: Option<Vec<TokenKind>> = None;

            for (name, value) in child.properties() {
                match name.as_str() {
                    "severity" => {
                        severity = Severity::parse(value).ok_or_else(|| {
                            property_error(check_name, name, value, "unknown severity")
                        })?;
                    }
                    "tokens" => {
                        token_override =
                            Some(parse_token_list(check_name, value, check.acceptable_tokens())?);
                    }
                    _ => {
                        check.set_property(name, value).map_err(|e| {
                            e.into_config_error(check_name).in_module(TREE_WALKER)
                        })?;
                    }
                }
            }

            let mut tokens = token_override.unwrap_or_else(|| check.default_tokens().to_vec());
            for required in check.required_tokens() {
                if !tokens.contains(required) {
                    tokens.push(*required);
                }
            }

            debug!(
                "loaded check {} subscribed to {} token kind(s)",
                check_name,
                tokens.len()
            );
            modules.push(LoadedModule {
                check,
                severity,
                tokens,
            });
        }

        let mut subscriptions: BTreeMap<TokenKind, Vec<usize>> = BTreeMap::new();
        for (index, module) in modules.iter().enumerate() {
            for token in &module.tokens {
                subscriptions.entry(*token).or_default().push(index);
            }
        }

        Ok(Self {
            modules,
            subscriptions,
        })
    }

    /// Number of loaded check modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Names of the loaded checks, in configuration order.
    #[must_use]
    pub fn check_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.check.name()).collect()
    }

    /// Runs one full traversal of `tree`, returning the collected
    /// violations in insertion order.
    ///
    /// # Errors
    ///
    /// A failure inside any check callback aborts this file's traversal and
    /// surfaces as [`CheckerError::CheckFailure`] carrying the check name
    /// and node position. Other files are unaffected.
    pub fn process(
        &mut self,
        path: &Path,
        source: &str,
        tree: &SyntaxTree,
    ) -> Result<Vec<Violation>, CheckerError> {
        let mut ctx = CheckContext::new(path, source);
        let root = tree.root();

        // State reset happens for every module, subscribed or not.
        for module in &mut self.modules {
            ctx.enter_module(module.check.name(), module.severity, module.check.messages());
            module.check.begin_tree(&mut ctx, tree).map_err(|e| {
                wrap_failure(module.check.name(), path, tree, root, &e.0)
            })?;
        }

        self.walk(&mut ctx, tree, root)?;

        for module in &mut self.modules {
            ctx.enter_module(module.check.name(), module.severity, module.check.messages());
            module.check.finish_tree(&mut ctx, tree).map_err(|e| {
                wrap_failure(module.check.name(), path, tree, root, &e.0)
            })?;
        }

        Ok(ctx.take_violations())
    }

    /// Calls the destroy hook on every module. The audit driver guarantees
    /// this runs exactly once per run, abort or not.
    pub fn destroy(&mut self) {
        for module in &mut self.modules {
            module.check.destroy();
        }
    }

    fn walk(
        &mut self,
        ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> Result<(), CheckerError> {
        self.dispatch(ctx, tree, node, Phase::Visit)?;
        for child in tree.children(node).to_vec() {
            self.walk(ctx, tree, child)?;
        }
        self.dispatch(ctx, tree, node, Phase::Leave)
    }

    fn dispatch(
        &mut self,
        ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
        phase: Phase,
    ) -> Result<(), CheckerError> {
        let Some(subscribers) = self.subscriptions.get(&tree.kind(node)) else {
            return Ok(());
        };
        for index in subscribers.clone() {
            let module = &mut self.modules[index];
            ctx.enter_module(module.check.name(), module.severity, module.check.messages());
            let outcome = match phase {
                Phase::Visit => module.check.visit(ctx, tree, node),
                Phase::Leave => module.check.leave(ctx, tree, node),
            };
            outcome.map_err(|e| {
                wrap_failure(module.check.name(), ctx.path(), tree, node, &e.0)
            })?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Visit,
    Leave,
}

fn wrap_failure(
    check: &str,
    path: &Path,
    tree: &SyntaxTree,
    node: NodeId,
    message: &str,
) -> CheckerError {
    CheckerError::CheckFailure {
        check: check.to_string(),
        path: path.to_path_buf(),
        line: tree.line(node),
        column: tree.column(node),
        message: message.to_string(),
    }
}

fn property_error(check: &str, name: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::new(ConfigCause::Property {
        name: name.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    })
    .in_module(check)
    .in_module(TREE_WALKER)
}

fn parse_token_list(
    check: &str,
    value: &str,
    acceptable: &[TokenKind],
) -> Result<Vec<TokenKind>, ConfigError> {
    let mut out = Vec::new();
    for raw in value.split(',') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        let kind = TokenKind::from_name(name)
            .ok_or_else(|| property_error(check, "tokens", value, "unknown token kind"))?;
        if !acceptable.contains(&kind) {
            return Err(property_error(
                check,
                "tokens",
                value,
                "token is not acceptable for this check",
            ));
        }
        out.push(kind);
    }
    Ok(out)
}
