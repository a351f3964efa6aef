//! Renders syntax trees as indented text diagrams.
//!
//! Every node prints as `KIND -> text [line:col]` (the arrow segment is
//! omitted when the node carries no text), with `|--` / `` `-- `` branch
//! connectors and `|   ` continuation bars.

use crate::tree::{NodeId, SyntaxTree};

/// Line separating independent tree fragments in multi-match output.
pub const FRAGMENT_DELIMITER: &str = "---------";

/// Renders the whole tree.
#[must_use]
pub fn print_tree(tree: &SyntaxTree) -> String {
    print_subtree(tree, tree.root())
}

/// Renders the subtree rooted at `node`.
#[must_use]
pub fn print_subtree(tree: &SyntaxTree, node: NodeId) -> String {
    let mut out = String::new();
    out.push_str(&render_node(tree, node));
    out.push('\n');
    let children = tree.children(node);
    for (i, child) in children.iter().enumerate() {
        print_child(tree, *child, "", i + 1 == children.len(), &mut out);
    }
    out
}

/// Renders several independent fragments separated by the fixed delimiter.
#[must_use]
pub fn print_fragments(tree: &SyntaxTree, roots: &[NodeId]) -> String {
    let mut out = String::new();
    for (i, root) in roots.iter().enumerate() {
        if i > 0 {
            out.push_str(FRAGMENT_DELIMITER);
            out.push('\n');
        }
        out.push_str(&print_subtree(tree, *root));
    }
    out
}

fn print_child(tree: &SyntaxTree, node: NodeId, prefix: &str, last: bool, out: &mut String) {
    let connector = if last { "`--" } else { "|--" };
    out.push_str(prefix);
    out.push_str(connector);
    out.push_str(&render_node(tree, node));
    out.push('\n');

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "|   " });
    let children = tree.children(node);
    for (i, child) in children.iter().enumerate() {
        print_child(tree, *child, &child_prefix, i + 1 == children.len(), out);
    }
}

fn render_node(tree: &SyntaxTree, node: NodeId) -> String {
    let kind = tree.kind(node).name();
    let position = format!("[{}:{}]", tree.line(node), tree.column(node));
    match tree.text(node) {
        Some(text) => format!("{kind} -> {} {position}", escape_text(text)),
        None => format!("{kind} {position}"),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('\n', "\\n").replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOptions};
    use crate::tree::TokenKind;

    #[test]
    fn prints_connectors_and_positions() {
        let tree = parse("class A {\n    int x = 1;\n}\n", ParseOptions::default()).unwrap();
        let printed = print_tree(&tree);

        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines[0], "COMPILATION_UNIT [1:1]");
        assert!(lines[1].starts_with("`--CLASS_DEF"));
        assert!(printed.contains("IDENT -> A [1:7]"));
        // Every non-root line carries a connector.
        for line in &lines[1..] {
            assert!(line.contains("|--") || line.contains("`--"), "bad line: {line}");
        }
    }

    #[test]
    fn last_child_uses_corner_connector() {
        let tree = parse(
            "package p;\nclass A {}\nclass B {}\n",
            ParseOptions::default(),
        )
        .unwrap();
        let printed = print_tree(&tree);
        let lines: Vec<&str> = printed.lines().collect();
        // The final top-level child is rendered with the corner connector.
        let last_top_level = lines
            .iter()
            .rposition(|l| l.starts_with("`--CLASS_DEF"))
            .unwrap();
        assert!(lines[last_top_level].contains("CLASS_DEF"));
    }

    #[test]
    fn fragments_are_separated_by_delimiter() {
        let tree = parse("class A {}\nclass B {}\n", ParseOptions::default()).unwrap();
        let classes: Vec<_> = tree
            .preorder()
            .into_iter()
            .filter(|n| tree.kind(*n) == TokenKind::ClassDef)
            .collect();
        let printed = print_fragments(&tree, &classes);
        assert_eq!(
            printed.lines().filter(|l| *l == FRAGMENT_DELIMITER).count(),
            1
        );
    }
}
