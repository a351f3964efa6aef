//! Restricted path-query language over syntax trees.
//!
//! Supported grammar, a deliberate subset of XPath:
//!
//! ```text
//! query     := ( '/' step | '//' step )+
//! step      := nametest predicate*
//! nametest  := KIND_NAME | '*'
//! predicate := '[' '@text=' quoted ']'
//!            | '[' './' KIND_NAME ( '[@text=' quoted ']' )? ']'
//!            | '[' integer ']'
//! ```
//!
//! `/` selects children, `//` selects descendants-or-self. Matches come
//! back in document order. The root step matches the parentless root
//! itself, so `/COMPILATION_UNIT` over a whole tree yields exactly one
//! match. This module also generates root-to-node queries for the
//! suppression writer.

use std::collections::HashSet;

use thiserror::Error;

use crate::tree::{NodeId, SyntaxTree, TokenKind};

/// Invalid query syntax, carrying the raw query text.
#[derive(Debug, Clone, Error)]
#[error("invalid query '{query}': {reason}")]
pub struct XpathError {
    /// The query exactly as supplied.
    pub query: String,
    /// What was wrong with it.
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    DescendantOrSelf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Kind(TokenKind),
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    TextEquals(String),
    ChildOfKind {
        kind: TokenKind,
        text: Option<String>,
    },
    Position(usize),
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    test: NameTest,
    predicates: Vec<Predicate>,
}

/// Evaluates `query` against `tree`, returning matches in document order.
///
/// # Errors
///
/// Returns an [`XpathError`] naming the raw query on any syntax problem.
pub fn evaluate(tree: &SyntaxTree, query: &str) -> Result<Vec<NodeId>, XpathError> {
    let steps = parse_query(query)?;
    let mut current: Vec<NodeId> = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        let candidates: Vec<NodeId> = if i == 0 {
            match step.axis {
                Axis::Child => vec![tree.root()],
                Axis::DescendantOrSelf => tree.preorder(),
            }
        } else {
            match step.axis {
                Axis::Child => current
                    .iter()
                    .flat_map(|n| tree.children(*n).iter().copied())
                    .collect(),
                Axis::DescendantOrSelf => current
                    .iter()
                    .flat_map(|n| tree.preorder_from(*n))
                    .collect(),
            }
        };

        let mut filtered: Vec<NodeId> = candidates
            .into_iter()
            .filter(|n| matches_step(tree, *n, step))
            .collect();

        for predicate in &step.predicates {
            if let Predicate::Position(pos) = predicate {
                filtered = match pos.checked_sub(1).and_then(|i| filtered.get(i)) {
                    Some(node) => vec![*node],
                    None => Vec::new(),
                };
            }
        }

        current = dedup_document_order(tree, filtered);
        if current.is_empty() {
            return Ok(current);
        }
    }

    Ok(current)
}

fn matches_step(tree: &SyntaxTree, node: NodeId, step: &Step) -> bool {
    let name_ok = match &step.test {
        NameTest::Kind(kind) => tree.kind(node) == *kind,
        NameTest::Any => true,
    };
    if !name_ok {
        return false;
    }
    step.predicates.iter().all(|p| match p {
        Predicate::TextEquals(expected) => tree.text(node) == Some(expected.as_str()),
        Predicate::ChildOfKind { kind, text } => tree.children(node).iter().any(|c| {
            tree.kind(*c) == *kind
                && text
                    .as_ref()
                    .map_or(true, |t| tree.text(*c) == Some(t.as_str()))
        }),
        Predicate::Position(_) => true,
    })
}

fn dedup_document_order(tree: &SyntaxTree, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let order = tree.preorder();
    let picked: HashSet<NodeId> = nodes.into_iter().collect();
    order.into_iter().filter(|n| picked.contains(n)).collect()
}

fn parse_query(query: &str) -> Result<Vec<Step>, XpathError> {
    let err = |reason: &str| XpathError {
        query: query.to_string(),
        reason: reason.to_string(),
    };

    if !query.starts_with('/') {
        return Err(err("query must start with '/'"));
    }

    let mut steps = Vec::new();
    let mut rest = query;
    while !rest.is_empty() {
        let axis = if let Some(tail) = rest.strip_prefix("//") {
            rest = tail;
            Axis::DescendantOrSelf
        } else if let Some(tail) = rest.strip_prefix('/') {
            rest = tail;
            Axis::Child
        } else {
            return Err(err("expected '/' between steps"));
        };

        let name_len = rest
            .find(|c: char| c == '/' || c == '[')
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = &rest[name_len..];
        if name.is_empty() {
            return Err(err("empty step name"));
        }
        let test = if name == "*" {
            NameTest::Any
        } else {
            NameTest::Kind(
                TokenKind::from_name(name)
                    .ok_or_else(|| err(&format!("unknown node kind '{name}'")))?,
            )
        };

        let mut predicates = Vec::new();
        while rest.starts_with('[') {
            let close = matching_bracket(rest).ok_or_else(|| err("unbalanced '['"))?;
            let inner = &rest[1..close];
            predicates.push(parse_predicate(inner).map_err(|reason| err(&reason))?);
            rest = &rest[close + 1..];
        }

        steps.push(Step {
            axis,
            test,
            predicates,
        });
    }

    if steps.is_empty() {
        return Err(err("query has no steps"));
    }
    Ok(steps)
}

/// Finds the `]` closing the bracket at position 0, accounting for nesting.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_predicate(inner: &str) -> Result<Predicate, String> {
    if let Some(rest) = inner.strip_prefix("@text=") {
        return Ok(Predicate::TextEquals(parse_quoted(rest)?));
    }
    if let Some(rest) = inner.strip_prefix("./") {
        let name_len = rest.find('[').unwrap_or(rest.len());
        let name = &rest[..name_len];
        let kind = TokenKind::from_name(name)
            .ok_or_else(|| format!("unknown node kind '{name}' in predicate"))?;
        let tail = &rest[name_len..];
        let text = if tail.is_empty() {
            None
        } else {
            let close = matching_bracket(tail).ok_or("unbalanced '[' in predicate")?;
            let nested = &tail[1..close];
            let value = nested
                .strip_prefix("@text=")
                .ok_or("expected @text= in nested predicate")?;
            Some(parse_quoted(value)?)
        };
        return Ok(Predicate::ChildOfKind { kind, text });
    }
    if let Ok(position) = inner.parse::<usize>() {
        if position == 0 {
            return Err("positions are 1-based".to_string());
        }
        return Ok(Predicate::Position(position));
    }
    Err(format!("unsupported predicate '{inner}'"))
}

fn parse_quoted(text: &str) -> Result<String, String> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .ok_or("expected single-quoted value")?;
    Ok(inner.to_string())
}

/// Generates the root-to-node query that identifies `node` exactly, using
/// identifier predicates where the path owns one.
#[must_use]
pub fn query_for_node(tree: &SyntaxTree, node: NodeId) -> String {
    let mut chain = vec![node];
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        chain.push(parent);
        current = parent;
    }
    chain.reverse();

    let mut out = String::new();
    for n in chain {
        out.push('/');
        out.push_str(tree.kind(n).name());
        if tree.kind(n) == TokenKind::Ident {
            if let Some(text) = tree.text(n) {
                out.push_str(&format!("[@text='{text}']"));
            }
        } else if let Some(ident) = tree.ident_of(n) {
            out.push_str(&format!("[./IDENT[@text='{ident}']]"));
        }
    }
    out
}
