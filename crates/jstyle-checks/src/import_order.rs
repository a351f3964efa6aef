//! Import-order check with configurable group rules.
//!
//! # Rule DSL
//!
//! The `customImportOrderRules` property is an ordered list of group names
//! joined by `###`, chosen from:
//!
//! - `STATIC` - static imports
//! - `SAME_PACKAGE(N)` - imports sharing the first N package segments with
//!   the file's own package; N must be a positive integer
//! - `STANDARD_JAVA_PACKAGE` - matched by `standardPackageRegExp`
//! - `SPECIAL_IMPORTS` - matched by `specialImportsRegExp`
//! - `THIRD_PARTY_PACKAGE` - matched by `thirdPartyPackageRegExp`
//!
//! Classification prefers the longest regex match; equal-length matches go
//! to the earliest-declared group. Static imports classify by their
//! target's declaring type, not the member name. Group order must be
//! non-decreasing along the file; `sortImportsInGroupAlphabetically`
//! additionally enforces lexicographic order within each group, and
//! `separateLineBetweenGroups` requires exactly the blank lines that sit on
//! group boundaries.

use jstyle_core::{
    Check, CheckContext, CheckResult, MessageBundle, NodeId, PropertyError, SyntaxTree, TokenKind,
};
use regex::Regex;

/// Canonical check name.
pub const NAME: &str = "ImportOrderCheck";

/// Message key: lexicographic order broken inside a group.
pub const MSG_LEX: &str = "import.order.lex";
/// Message key: group appears after a later-ordered group.
pub const MSG_ORDER: &str = "import.order.group";
/// Message key: import matches no configured group.
pub const MSG_NONGROUP: &str = "import.order.nongroup";
/// Message key: missing blank line on a group transition.
pub const MSG_LINE_SEPARATOR: &str = "import.order.separator";
/// Message key: stray blank line inside a single group.
pub const MSG_SEPARATED_IN_GROUP: &str = "import.order.separated";

const MESSAGES: MessageBundle = MessageBundle {
    name: "jstyle.checks.imports",
    entries: &[
        (
            MSG_LEX,
            "Import '{0}' is out of alphabetical order, should come before '{1}'",
        ),
        (
            MSG_ORDER,
            "Import '{2}' belongs to group '{0}', which must appear before group '{1}'",
        ),
        (MSG_NONGROUP, "Import '{0}' does not match any configured group"),
        (
            MSG_LINE_SEPARATOR,
            "Group transition at import '{0}' requires a preceding blank line",
        ),
        (
            MSG_SEPARATED_IN_GROUP,
            "Import '{0}' is separated from the rest of its group by a blank line",
        ),
    ],
};

const TOKENS: &[TokenKind] = &[
    TokenKind::Import,
    TokenKind::StaticImport,
    TokenKind::PackageDef,
];

/// One configured group rule, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupRule {
    Static,
    SamePackage(usize),
    StandardJava,
    Special,
    ThirdParty,
}

impl GroupRule {
    fn label(&self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::SamePackage(_) => "SAME_PACKAGE",
            Self::StandardJava => "STANDARD_JAVA_PACKAGE",
            Self::Special => "SPECIAL_IMPORTS",
            Self::ThirdParty => "THIRD_PARTY_PACKAGE",
        }
    }

    fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone)]
struct ImportEntry {
    path: String,
    is_static: bool,
    line: usize,
    column: usize,
}

/// Checks that import statements follow the configured group order.
pub struct ImportOrder {
    rules: Vec<GroupRule>,
    standard_re: Regex,
    special_re: Regex,
    third_party_re: Regex,
    sort_alphabetically: bool,
    separate_groups: bool,

    // Per-file state, reset in begin_tree.
    package: String,
    imports: Vec<ImportEntry>,
}

impl Default for ImportOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportOrder {
    /// Creates the check with default matchers and no group rules.
    #[must_use]
    #[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
    pub fn new() -> Self {
        // The default patterns are fixed and known to compile.
        Self {
            rules: Vec::new(),
            standard_re: Regex::new(r"^(java|javax)\.").unwrap(),
            special_re: Regex::new("^$").unwrap(),
            third_party_re: Regex::new(".*").unwrap(),
            sort_alphabetically: false,
            separate_groups: true,
            package: String::new(),
            imports: Vec::new(),
        }
    }

    fn parse_rules(dsl: &str) -> Result<Vec<GroupRule>, String> {
        let mut rules = Vec::new();
        for token in dsl.split("###").map(str::trim).filter(|t| !t.is_empty()) {
            let rule = if token == "STATIC" {
                GroupRule::Static
            } else if token == "STANDARD_JAVA_PACKAGE" {
                GroupRule::StandardJava
            } else if token == "SPECIAL_IMPORTS" {
                GroupRule::Special
            } else if token == "THIRD_PARTY_PACKAGE" {
                GroupRule::ThirdParty
            } else if let Some(arg) = token
                .strip_prefix("SAME_PACKAGE(")
                .and_then(|t| t.strip_suffix(')'))
            {
                let depth = arg.trim().parse::<i64>().map_err(|_| {
                    format!("SAME_PACKAGE rule parameter should be positive integer: {token}")
                })?;
                if depth <= 0 {
                    return Err(format!(
                        "SAME_PACKAGE rule parameter should be positive integer: {token}"
                    ));
                }
                #[allow(clippy::cast_sign_loss)]
                GroupRule::SamePackage(depth as usize)
            } else {
                return Err(format!("Unexpected rule: {token}"));
            };
            if rules.iter().any(|r: &GroupRule| r.same_variant(&rule)) {
                return Err(format!("Duplicate rule: {token}"));
            }
            rules.push(rule);
        }
        Ok(rules)
    }

    /// Classifies an import against the configured rules; returns the index
    /// of the best-matching rule.
    ///
    /// Longest matched substring wins; equal-length matches go to the
    /// earliest-declared rule. `SAME_PACKAGE(N)` with N deeper than the
    /// file's package matches nothing. Static imports are classified by
    /// their declaring type path unless a `STATIC` group is configured.
    fn classify(&self, entry: &ImportEntry) -> Option<usize> {
        if entry.is_static {
            if let Some(idx) = self.rules.iter().position(|r| matches!(r, GroupRule::Static)) {
                return Some(idx);
            }
        }
        let path = if entry.is_static {
            declaring_type_path(&entry.path)
        } else {
            entry.path.as_str()
        };

        let mut best: Option<(usize, usize)> = None;
        for (idx, rule) in self.rules.iter().enumerate() {
            let matched = match rule {
                GroupRule::Static => None,
                GroupRule::SamePackage(depth) => {
                    same_package_match_len(&self.package, path, *depth)
                }
                GroupRule::StandardJava => regex_match_len(&self.standard_re, path),
                GroupRule::Special => regex_match_len(&self.special_re, path),
                GroupRule::ThirdParty => regex_match_len(&self.third_party_re, path),
            };
            if let Some(len) = matched {
                let better = best.map_or(true, |(best_len, _)| len > best_len);
                if better {
                    best = Some((len, idx));
                }
            }
        }
        best.map(|(_, idx)| idx)
    }

    fn check_order(&self, ctx: &mut CheckContext<'_>) {
        let lines: Vec<&str> = ctx.source().lines().collect();
        let blank_between = |from: usize, to: usize| -> bool {
            (from..to.saturating_sub(1))
                .any(|i| lines.get(i).map_or(false, |l| l.trim().is_empty()))
        };

        let mut current: Option<usize> = None;
        let mut max_in_group: Option<String> = None;
        let mut prev_line: Option<usize> = None;

        for entry in &self.imports {
            // With no rules configured every import forms one implicit
            // group; only separator and alphabetical checks apply.
            let group = if self.rules.is_empty() {
                Some(0)
            } else {
                self.classify(entry)
            };
            let Some(idx) = group else {
                ctx.report(entry.line, Some(entry.column), MSG_NONGROUP, &[&entry.path]);
                prev_line = Some(entry.line);
                continue;
            };

            match current {
                None => {
                    current = Some(idx);
                    max_in_group = Some(entry.path.clone());
                }
                Some(cur) if idx == cur => {
                    if self.separate_groups {
                        if let Some(prev) = prev_line {
                            if blank_between(prev, entry.line) {
                                ctx.report(
                                    entry.line,
                                    Some(entry.column),
                                    MSG_SEPARATED_IN_GROUP,
                                    &[&entry.path],
                                );
                            }
                        }
                    }
                    if self.sort_alphabetically {
                        match &max_in_group {
                            Some(max) if entry.path.as_str() < max.as_str() => {
                                ctx.report(
                                    entry.line,
                                    Some(entry.column),
                                    MSG_LEX,
                                    &[&entry.path, max],
                                );
                            }
                            _ => max_in_group = Some(entry.path.clone()),
                        }
                    } else {
                        max_in_group = Some(entry.path.clone());
                    }
                }
                Some(cur) if idx > cur => {
                    if self.separate_groups {
                        if let Some(prev) = prev_line {
                            if !blank_between(prev, entry.line) {
                                ctx.report(
                                    entry.line,
                                    Some(entry.column),
                                    MSG_LINE_SEPARATOR,
                                    &[&entry.path],
                                );
                            }
                        }
                    }
                    current = Some(idx);
                    max_in_group = Some(entry.path.clone());
                }
                Some(cur) => {
                    let import_group = self.rules.get(idx).map_or("", GroupRule::label);
                    let current_group = self.rules.get(cur).map_or("", GroupRule::label);
                    ctx.report(
                        entry.line,
                        Some(entry.column),
                        MSG_ORDER,
                        &[import_group, current_group, &entry.path],
                    );
                }
            }
            prev_line = Some(entry.line);
        }
    }
}

impl Check for ImportOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks that import statements follow configured group ordering"
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
        let invalid = |message: String| PropertyError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
            message,
        };
        match name {
            "customImportOrderRules" => {
                self.rules = Self::parse_rules(value).map_err(invalid)?;
            }
            "standardPackageRegExp" => {
                self.standard_re = Regex::new(value).map_err(|e| invalid(e.to_string()))?;
            }
            "specialImportsRegExp" => {
                self.special_re = Regex::new(value).map_err(|e| invalid(e.to_string()))?;
            }
            "thirdPartyPackageRegExp" => {
                self.third_party_re = Regex::new(value).map_err(|e| invalid(e.to_string()))?;
            }
            "sortImportsInGroupAlphabetically" => {
                self.sort_alphabetically =
                    value.parse().map_err(|_| invalid("expected true or false".into()))?;
            }
            "separateLineBetweenGroups" => {
                self.separate_groups =
                    value.parse().map_err(|_| invalid("expected true or false".into()))?;
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
        self.package.clear();
        self.imports.clear();
        Ok(())
    }

    fn visit(
        &mut self,
        _ctx: &mut CheckContext<'_>,
        tree: &SyntaxTree,
        node: NodeId,
    ) -> CheckResult {
        match tree.kind(node) {
            TokenKind::PackageDef => {
                self.package = tree.text(node).unwrap_or_default().to_string();
            }
            TokenKind::Import | TokenKind::StaticImport => {
                self.imports.push(ImportEntry {
                    path: tree.text(node).unwrap_or_default().to_string(),
                    is_static: tree.kind(node) == TokenKind::StaticImport,
                    line: tree.line(node),
                    column: tree.column(node),
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn finish_tree(&mut self, ctx: &mut CheckContext<'_>, _tree: &SyntaxTree) -> CheckResult {
        self.check_order(ctx);
        Ok(())
    }
}

/// `java.awt.Button.ABORT` imports a member of `java.awt.Button`; group
/// matching runs against the declaring type path.
fn declaring_type_path(path: &str) -> &str {
    path.rfind('.').map_or(path, |i| &path[..i])
}

fn regex_match_len(re: &Regex, path: &str) -> Option<usize> {
    re.find(path).map(|m| m.end() - m.start())
}

fn same_package_match_len(package: &str, path: &str, depth: usize) -> Option<usize> {
    if package.is_empty() {
        return None;
    }
    let segments: Vec<&str> = package.split('.').collect();
    if depth > segments.len() {
        return None;
    }
    let prefix = segments[..depth].join(".");
    let qualified = format!("{prefix}.");
    if path == prefix || path.starts_with(&qualified) {
        Some(prefix.len())
    } else {
        None
    }
}
