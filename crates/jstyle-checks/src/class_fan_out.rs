//! Counts distinct classes a type depends on.

use std::collections::BTreeSet;

use jstyle_core::{
    Check, CheckContext, CheckResult, MessageBundle, NodeId, PropertyError, SyntaxTree, TokenKind,
};

/// Canonical check name.
pub const NAME: &str = "ClassFanOutCheck";

/// Message key for an over-coupled class.
pub const MSG_FAN_OUT: &str = "class.fan.out";

const MESSAGES: MessageBundle = MessageBundle {
    name: "jstyle.checks.metrics",
    entries: &[(
        MSG_FAN_OUT,
        "Class fan-out complexity is {0} (max allowed is {1})",
    )],
};

const TOKENS: &[TokenKind] = &[
    TokenKind::ClassDef,
    TokenKind::InterfaceDef,
    TokenKind::EnumDef,
    TokenKind::TypeIdent,
];

/// Common JDK value and utility types that do not count toward coupling.
const DEFAULT_EXCLUDED: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "Double",
    "Exception",
    "Float",
    "Integer",
    "Long",
    "Math",
    "Object",
    "RuntimeException",
    "Short",
    "String",
    "StringBuilder",
    "Throwable",
    "Void",
    "ArrayList",
    "HashMap",
    "HashSet",
    "List",
    "Map",
    "Set",
    "Optional",
    "Override",
    "Deprecated",
    "SuppressWarnings",
];

struct ClassScope {
    node: NodeId,
    name: String,
    referenced: BTreeSet<String>,
}

/// Checks the number of distinct types each class references.
///
/// References accumulate while the traversal is inside the class body and
/// the count is reported when the class definition is left, so nested
/// classes are measured independently.
pub struct ClassFanOut {
    max: usize,
    excluded: BTreeSet<String>,

    // Per-file state, reset in begin_tree.
    stack: Vec<ClassScope>,
}

impl Default for ClassFanOut {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassFanOut {
    /// Creates the check with the default limit of 20.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max: 20,
            excluded: DEFAULT_EXCLUDED.iter().map(|s| (*s).to_string()).collect(),
            stack: Vec::new(),
        }
    }

    fn is_type_definition(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::ClassDef | TokenKind::InterfaceDef | TokenKind::EnumDef
        )
    }
}

impl Check for ClassFanOut {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks the number of distinct types a class depends on"
    }

    fn acceptable_tokens(&self) -> &'static [TokenKind] {
        TOKENS
    }

    fn required_tokens(&self) -> &'static [TokenKind] {
        TOKENS
    }

    fn messages(&self) -> MessageBundle {
        MESSAGES
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "max" => {
                self.max = value.parse().map_err(|_| PropertyError::Invalid {
                    name: name.to_string(),
                    value: value.to_string(),
                    message: "expected a non-negative integer".to_string(),
                })?;
            }
            "excludedClasses" => {
                self.excluded = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            _ => {
                return Err(PropertyError::Unknown {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn begin_tree(&mut self, _ctx: &mut CheckContext<'_>, _tree: &SyntaxTree) -> CheckResult {
        self.stack.clear();
        Ok(())
    }

    fn visit(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> CheckResult {
        let kind = tree.kind(node);
        if Self::is_type_definition(kind) {
            self.stack.push(ClassScope {
                node,
                name: tree.ident_of(node).unwrap_or_default().to_string(),
                referenced: BTreeSet::new(),
            });
        } else if kind == TokenKind::TypeIdent {
            if let Some(scope) = self.stack.last_mut() {
                if let Some(text) = tree.text(node) {
                    if text != scope.name && !self.excluded.contains(text) {
                        scope.referenced.insert(text.to_string());
                    }
                }
            }
        }
        Ok(())
    }

    fn leave(
        &mut self,
        ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> CheckResult {
        if !Self::is_type_definition(tree.kind(node)) {
            return Ok(());
        }
        if let Some(scope) = self.stack.pop() {
            let count = scope.referenced.len();
            if count > self.max {
                let count = count.to_string();
                let max = self.max.to_string();
                ctx.report(
                    tree.line(scope.node),
                    Some(tree.column(scope.node)),
                    MSG_FAN_OUT,
                    &[&count, &max],
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jstyle_core::{
        parse, CheckConfig, CheckRegistry, ParseOptions, TreeWalker, Violation, TREE_WALKER,
    };
    use std::path::Path;

    fn run(properties: &[(&str, &str)], source: &str) -> Vec<Violation> {
        let mut registry = CheckRegistry::new();
        registry.register("jstyle.checks.ClassFanOutCheck", || Box::new(ClassFanOut::new()));
        let mut config = CheckConfig::new(NAME);
        for (name, value) in properties {
            config = config.with_property(*name, *value);
        }
        let walker_config = CheckConfig::new(TREE_WALKER).with_child(config);
        let mut walker = TreeWalker::from_config(&walker_config, &registry).unwrap();
        let tree = parse(source, ParseOptions::default()).unwrap();
        walker.process(Path::new("Input.java"), source, &tree).unwrap()
    }

    const COUPLED: &str = "class Hub {\n    Alpha a;\n    Beta b;\n    Gamma c;\n    Delta d;\n}\n";

    #[test]
    fn class_under_limit_passes() {
        assert!(run(&[("max", "4")], COUPLED).is_empty());
    }

    #[test]
    fn class_over_limit_is_reported_with_counts() {
        let violations = run(&[("max", "3")], COUPLED);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, MSG_FAN_OUT);
        assert_eq!(violations[0].args, vec!["4", "3"]);
        assert_eq!(violations[0].line, 1);
    }

    #[test]
    fn duplicate_references_count_once() {
        let source = "class A {\n    Widget one;\n    Widget two;\n    Widget three;\n}\n";
        assert!(run(&[("max", "1")], source).is_empty());
    }

    #[test]
    fn own_name_and_excluded_classes_do_not_count() {
        let source = "class A {\n    A self;\n    String s;\n    Integer i;\n    Widget w;\n}\n";
        let violations = run(&[("max", "0")], source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["1", "0"]);
    }

    #[test]
    fn nested_classes_are_measured_independently() {
        let source = "class Outer {\n    Alpha a;\n    class Inner {\n        Beta b;\n        Gamma c;\n    }\n}\n";
        let violations = run(&[("max", "1")], source);
        // Inner references two types; Outer references Alpha plus nothing
        // from Inner's body.
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["2", "1"]);
    }

    #[test]
    fn excluded_classes_property_replaces_default() {
        let source = "class A {\n    Widget w;\n    String s;\n}\n";
        // String is no longer excluded, Widget now is.
        let violations = run(&[("max", "0"), ("excludedClasses", "Widget")], source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["1", "0"]);
    }

    #[test]
    fn invalid_max_is_a_load_error() {
        let mut registry = CheckRegistry::new();
        registry.register("jstyle.checks.ClassFanOutCheck", || Box::new(ClassFanOut::new()));
        let walker_config = CheckConfig::new(TREE_WALKER)
            .with_child(CheckConfig::new(NAME).with_property("max", "plenty"));
        let err = TreeWalker::from_config(&walker_config, &registry).err().unwrap();
        assert!(err.to_string().contains("plenty"));
    }
}
