//! Flags numeric literals that are not named constants.

use jstyle_core::{
    Check, CheckContext, CheckResult, MessageBundle, NodeId, PropertyError, SyntaxTree, TokenKind,
};

/// Canonical check name.
pub const NAME: &str = "MagicNumberCheck";

/// Message key for a flagged literal.
pub const MSG_MAGIC: &str = "magic.number";

const MESSAGES: MessageBundle = MessageBundle {
    name: "jstyle.checks.coding",
    entries: &[(MSG_MAGIC, "'{0}' is a magic number")],
};

const TOKENS: &[TokenKind] = &[TokenKind::NumInt, TokenKind::NumFloat];

/// Checks for numeric literals outside constant definitions.
///
/// A literal is acceptable when its value appears in `ignoreNumbers`, when
/// it initializes a `final` field or variable, or when one of the ignore
/// flags covers its context.
pub struct MagicNumber {
    ignore_numbers: Vec<f64>,
    ignore_hash_code_method: bool,
    ignore_annotation: bool,
}

impl Default for MagicNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl MagicNumber {
    /// Creates the check with the default ignore list `-1, 0, 1, 2`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore_numbers: vec![-1.0, 0.0, 1.0, 2.0],
            ignore_hash_code_method: false,
            ignore_annotation: false,
        }
    }

    fn is_ignored_value(&self, value: f64) -> bool {
        self.ignore_numbers
            .iter()
            .any(|n| (n - value).abs() < f64::EPSILON)
    }

    fn in_constant_definition(tree: &SyntaxTree, node: NodeId) -> bool {
        for kind in [TokenKind::FieldDef, TokenKind::VariableDef] {
            if let Some(def) = tree.ancestor_of_kind(node, kind) {
                let is_final = tree
                    .children(def)
                    .iter()
                    .find(|c| tree.kind(**c) == TokenKind::Modifiers)
                    .and_then(|c| tree.text(*c))
                    .map_or(false, |m| m.split_whitespace().any(|w| w == "final"));
                if is_final {
                    return true;
                }
            }
        }
        false
    }

    fn in_hash_code_method(tree: &SyntaxTree, node: NodeId) -> bool {
        tree.ancestor_of_kind(node, TokenKind::MethodDef)
            .and_then(|m| tree.ident_of(m).map(|n| n == "hashCode"))
            .unwrap_or(false)
    }
}

impl Check for MagicNumber {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks for numeric literals outside constant definitions"
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
            "ignoreNumbers" => {
                let mut numbers = Vec::new();
                for raw in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let parsed = raw.parse::<f64>().map_err(|_| PropertyError::Invalid {
                        name: name.to_string(),
                        value: value.to_string(),
                        message: format!("not a number: {raw}"),
                    })?;
                    numbers.push(parsed);
                }
                self.ignore_numbers = numbers;
            }
            "ignoreHashCodeMethod" => {
                self.ignore_hash_code_method = parse_bool(name, value)?;
            }
            "ignoreAnnotation" => {
                self.ignore_annotation = parse_bool(name, value)?;
            }
            _ => {
                return Err(PropertyError::Unknown {
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn visit(
        &mut self,
        ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> CheckResult {
        let Some(text) = tree.text(node) else {
            return Ok(());
        };
        let Some(value) = parse_java_number(text) else {
            return Ok(());
        };
        if self.is_ignored_value(value)
            || Self::in_constant_definition(tree, node)
            || (self.ignore_annotation
                && tree.ancestor_of_kind(node, TokenKind::Annotation).is_some())
            || (self.ignore_hash_code_method && Self::in_hash_code_method(tree, node))
        {
            return Ok(());
        }
        ctx.report(tree.line(node), Some(tree.column(node)), MSG_MAGIC, &[text]);
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, PropertyError> {
    value.parse().map_err(|_| PropertyError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
        message: "expected true or false".to_string(),
    })
}

/// Parses a Java numeric literal: underscore separators, radix prefixes,
/// and integer/float suffixes.
fn parse_java_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        let hex = hex.trim_end_matches('l');
        return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        let bin = bin.trim_end_matches('l');
        return i64::from_str_radix(bin, 2).ok().map(|v| v as f64);
    }

    let trimmed = lower.trim_end_matches(['l', 'f', 'd']);
    if trimmed.len() > 1 && trimmed.starts_with('0') && !trimmed.contains('.') {
        return i64::from_str_radix(&trimmed[1..], 8).ok().map(|v| v as f64);
    }
    trimmed.parse::<f64>().ok()
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
        registry.register("jstyle.checks.MagicNumberCheck", || Box::new(MagicNumber::new()));
        let mut config = CheckConfig::new(NAME);
        for (name, value) in properties {
            config = config.with_property(*name, *value);
        }
        let walker_config = CheckConfig::new(TREE_WALKER).with_child(config);
        let mut walker = TreeWalker::from_config(&walker_config, &registry).unwrap();
        let tree = parse(source, ParseOptions::default()).unwrap();
        walker.process(Path::new("Input.java"), source, &tree).unwrap()
    }

    #[test]
    fn flags_literal_outside_ignore_list() {
        let source = "class A {\n    int port = 8080;\n}\n";
        let violations = run(&[], source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, MSG_MAGIC);
        assert_eq!(violations[0].args, vec!["8080"]);
        assert_eq!(violations[0].line, 2);
    }

    #[test]
    fn default_ignore_list_passes_small_values() {
        let source = "class A {\n    int a = -1;\n    int b = 0;\n    int c = 1;\n    int d = 2;\n}\n";
        assert!(run(&[], source).is_empty());
    }

    #[test]
    fn final_field_is_a_constant_definition() {
        let source = "class A {\n    private static final int PORT = 8080;\n}\n";
        assert!(run(&[], source).is_empty());
    }

    #[test]
    fn final_local_variable_is_a_constant_definition() {
        let source = "class A {\n    void m() {\n        final int limit = 50;\n    }\n}\n";
        assert!(run(&[], source).is_empty());
    }

    #[test]
    fn custom_ignore_list_replaces_default() {
        let source = "class A {\n    int a = 2;\n    int b = 16;\n}\n";
        let violations = run(&[("ignoreNumbers", "0, 16")], source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["2"]);
    }

    #[test]
    fn hash_code_method_can_be_ignored() {
        let source =
            "class A {\n    public int hashCode() {\n        return 31;\n    }\n}\n";
        assert_eq!(run(&[], source).len(), 1);
        assert!(run(&[("ignoreHashCodeMethod", "true")], source).is_empty());
    }

    #[test]
    fn hex_and_suffixed_literals_compare_by_value() {
        let source = "class A {\n    long mask = 0xFF;\n    long big = 2L;\n}\n";
        let violations = run(&[("ignoreNumbers", "-1, 0, 1, 2, 255")], source);
        assert!(violations.is_empty());
    }

    #[test]
    fn malformed_ignore_list_names_the_bad_token() {
        let mut registry = CheckRegistry::new();
        registry.register("jstyle.checks.MagicNumberCheck", || Box::new(MagicNumber::new()));
        let walker_config = CheckConfig::new(TREE_WALKER)
            .with_child(CheckConfig::new(NAME).with_property("ignoreNumbers", "1, nope"));
        let err = TreeWalker::from_config(&walker_config, &registry).err().unwrap();
        assert!(err.to_string().contains("not a number: nope"));
    }
}
