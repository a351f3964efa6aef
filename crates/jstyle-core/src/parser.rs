//! Parser collaborator built on tree-sitter's Java grammar.
//!
//! The engine treats parsing as an external capability: given source text it
//! gets back a [`SyntaxTree`] or a [`ParseError`] with a position. This
//! module adapts the tree-sitter CST onto the closed [`TokenKind`]
//! enumeration; grammar productions without a mapping are spliced out and
//! their children lifted into the nearest mapped ancestor.

use thiserror::Error;
use tree_sitter::Node;

use crate::tree::{NodeId, SyntaxTree, TokenKind, TreeBuilder};

/// Options controlling which auxiliary nodes the parse includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Include comment nodes in the tree.
    pub include_comments: bool,
    /// Additionally reparse javadoc comment bodies into grafted sub-trees.
    ///
    /// Grafted sub-trees use their own coordinate space (line 1 is the first
    /// line of the comment body); callers must not assume alignment with the
    /// enclosing file.
    pub include_javadoc: bool,
}

/// Failure to parse a source file.
#[derive(Debug, Clone, Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    /// 1-based line of the first malformed construct.
    pub line: usize,
    /// 1-based column of the first malformed construct.
    pub column: usize,
    /// Description of the failure.
    pub message: String,
}

/// Parses Java source text into a syntax tree.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the position of the first syntax error
/// when the input is not well-formed.
pub fn parse(source: &str, options: ParseOptions) -> Result<SyntaxTree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ParseError {
            line: 1,
            column: 1,
            message: format!("failed to load Java grammar: {e}"),
        })?;

    let cst = parser.parse(source, None).ok_or_else(|| ParseError {
        line: 1,
        column: 1,
        message: "parser returned no tree".to_string(),
    })?;

    let root = cst.root_node();
    if root.has_error() {
        let err = first_error(root);
        return Err(ParseError {
            line: err.start_position().row + 1,
            column: err.start_position().column + 1,
            message: "unexpected token".to_string(),
        });
    }

    let builder = TreeBuilder::new(TokenKind::CompilationUnit, 1, 1);
    let target = builder.root();
    let mut converter = Converter {
        source,
        options,
        builder,
    };
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        converter.convert(child, target);
    }
    Ok(converter.builder.finish())
}

/// Parses a javadoc comment body in isolation.
///
/// The resulting mini-tree has its own coordinate space: line 1 is the first
/// line of `body`, independent of where the comment sat in any file.
#[must_use]
pub fn parse_javadoc(body: &str) -> SyntaxTree {
    let mut builder = TreeBuilder::new(TokenKind::Javadoc, 1, 1);
    let root = builder.root();
    build_javadoc(&mut builder, root, body, 0);
    builder.finish()
}

/// Appends the javadoc mini-tree for `body` under `parent`.
///
/// `line_offset` shifts the mini-tree's coordinate space; it is zero for the
/// standalone entry point and only used when grafting into a full parse.
fn build_javadoc(builder: &mut TreeBuilder, parent: NodeId, body: &str, line_offset: usize) {
    for (i, raw_line) in body.lines().enumerate() {
        let line = line_offset + i + 1;
        // Strip the conventional leading asterisk decoration.
        let trimmed = raw_line.trim_start();
        let content = trimmed.strip_prefix('*').unwrap_or(trimmed).trim();
        if content.is_empty() {
            continue;
        }
        let column = raw_line.len() - raw_line.trim_start().len() + 1;
        if let Some(rest) = content.strip_prefix('@') {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let tag = parts.next().unwrap_or_default();
            let tag_node = builder.add_child(
                parent,
                TokenKind::JavadocTag,
                line,
                column,
                Some(format!("@{tag}")),
            );
            if let Some(desc) = parts.next() {
                let desc = desc.trim();
                if !desc.is_empty() {
                    builder.add_child(
                        tag_node,
                        TokenKind::JavadocText,
                        line,
                        column,
                        Some(desc.to_string()),
                    );
                }
            }
        } else {
            builder.add_child(
                parent,
                TokenKind::JavadocText,
                line,
                column,
                Some(content.to_string()),
            );
        }
    }
}

fn first_error(node: Node<'_>) -> Node<'_> {
    if node.is_error() || node.is_missing() {
        return node;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error(child);
        }
    }
    node
}

struct Converter<'a> {
    source: &'a str,
    options: ParseOptions,
    builder: TreeBuilder,
}

impl<'a> Converter<'a> {
    fn convert(&mut self, node: Node<'_>, parent: NodeId) {
        let grammar_kind = node.kind();

        if grammar_kind == "line_comment" || grammar_kind == "block_comment" {
            self.convert_comment(node, parent);
            return;
        }

        let Some(kind) = map_kind(grammar_kind) else {
            // Unmapped production: lift children into the current parent.
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                self.convert(child, parent);
            }
            return;
        };

        let kind = match kind {
            TokenKind::Import if self.is_static_import(node) => TokenKind::StaticImport,
            other => other,
        };

        let pos = node.start_position();
        let id = self
            .builder
            .add_child(parent, kind, pos.row + 1, pos.column + 1, None);

        match kind {
            TokenKind::Import | TokenKind::StaticImport => {
                self.builder.set_text(id, self.import_path(node));
                // Leaf in our model; the dotted path is the whole payload.
            }
            TokenKind::PackageDef => {
                self.builder.set_text(id, self.package_name(node));
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.convert(child, id);
                }
            }
            _ => {
                if let Some(text) = leaf_text(kind, self.node_text(node)) {
                    self.builder.set_text(id, text);
                }
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.convert(child, id);
                }
            }
        }
    }

    fn convert_comment(&mut self, node: Node<'_>, parent: NodeId) {
        if !self.options.include_comments {
            return;
        }
        let text = self.node_text(node);
        let pos = node.start_position();
        let is_javadoc = text.starts_with("/**");
        let kind = if node.kind() == "line_comment" {
            TokenKind::SingleLineComment
        } else if is_javadoc {
            TokenKind::Javadoc
        } else {
            TokenKind::BlockComment
        };
        let id = self.builder.add_child(
            parent,
            kind,
            pos.row + 1,
            pos.column + 1,
            Some(text.to_string()),
        );
        if is_javadoc && self.options.include_javadoc {
            let body = text
                .strip_prefix("/**")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or("");
            build_javadoc(&mut self.builder, id, body, 0);
        }
    }

    // Tied to the source text, not to &self, so payloads can be read while
    // the builder is borrowed mutably.
    fn node_text(&self, node: Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn is_static_import(&self, node: Node<'_>) -> bool {
        let mut cursor = node.walk();
        let is_static = node.children(&mut cursor).any(|c| c.kind() == "static");
        is_static
    }

    /// Extracts the dotted import path, including a trailing `.*` for
    /// on-demand imports and excluding the `static` keyword.
    fn import_path(&self, node: Node<'_>) -> String {
        let text = self.node_text(node);
        let body = text
            .trim_start()
            .strip_prefix("import")
            .unwrap_or(text)
            .trim_end()
            .strip_suffix(';')
            .unwrap_or(text)
            .trim();
        let body = body.strip_prefix("static").map_or(body, str::trim_start);
        body.split_whitespace().collect::<String>()
    }

    fn package_name(&self, node: Node<'_>) -> String {
        let text = self.node_text(node);
        let body = text
            .trim_start()
            .strip_prefix("package")
            .unwrap_or(text)
            .trim_end()
            .strip_suffix(';')
            .unwrap_or(text)
            .trim();
        body.split_whitespace().collect::<String>()
    }
}

/// Payload rule per kind: identifiers and literals keep their source text,
/// structural nodes carry none.
fn leaf_text(kind: TokenKind, text: &str) -> Option<String> {
    match kind {
        TokenKind::Ident
        | TokenKind::TypeIdent
        | TokenKind::Dot
        | TokenKind::NumInt
        | TokenKind::NumFloat
        | TokenKind::StringLiteral
        | TokenKind::CharLiteral
        | TokenKind::Modifiers => Some(text.to_string()),
        _ => None,
    }
}

fn map_kind(grammar: &str) -> Option<TokenKind> {
    let kind = match grammar {
        "program" => TokenKind::CompilationUnit,
        "package_declaration" => TokenKind::PackageDef,
        "import_declaration" => TokenKind::Import,
        "class_declaration" => TokenKind::ClassDef,
        "interface_declaration" => TokenKind::InterfaceDef,
        "enum_declaration" => TokenKind::EnumDef,
        "annotation_type_declaration" => TokenKind::AnnotationDef,
        "class_body" | "interface_body" | "enum_body" | "annotation_type_body" => {
            TokenKind::ObjBlock
        }
        "enum_constant" => TokenKind::EnumConstantDef,
        "method_declaration" => TokenKind::MethodDef,
        "constructor_declaration" => TokenKind::CtorDef,
        "field_declaration" => TokenKind::FieldDef,
        "local_variable_declaration" => TokenKind::VariableDef,
        "formal_parameter" => TokenKind::ParameterDef,
        "modifiers" => TokenKind::Modifiers,
        "annotation" | "marker_annotation" => TokenKind::Annotation,
        "type_identifier" => TokenKind::TypeIdent,
        "identifier" => TokenKind::Ident,
        "block" => TokenKind::Slist,
        "if_statement" => TokenKind::LiteralIf,
        "for_statement" | "enhanced_for_statement" => TokenKind::LiteralFor,
        "while_statement" => TokenKind::LiteralWhile,
        "do_statement" => TokenKind::LiteralDo,
        "switch_expression" => TokenKind::LiteralSwitch,
        "switch_block_statement_group" => TokenKind::CaseGroup,
        "try_statement" | "try_with_resources_statement" => TokenKind::LiteralTry,
        "catch_clause" => TokenKind::LiteralCatch,
        "finally_clause" => TokenKind::LiteralFinally,
        "return_statement" => TokenKind::LiteralReturn,
        "throw_statement" => TokenKind::LiteralThrow,
        "object_creation_expression" => TokenKind::LiteralNew,
        "expression_statement" => TokenKind::Expr,
        "method_invocation" => TokenKind::MethodCall,
        "assignment_expression" => TokenKind::Assign,
        "field_access" | "scoped_identifier" => TokenKind::Dot,
        "decimal_integer_literal"
        | "hex_integer_literal"
        | "octal_integer_literal"
        | "binary_integer_literal" => TokenKind::NumInt,
        "decimal_floating_point_literal" | "hex_floating_point_literal" => TokenKind::NumFloat,
        "string_literal" => TokenKind::StringLiteral,
        "character_literal" => TokenKind::CharLiteral,
        "true" => TokenKind::LiteralTrue,
        "false" => TokenKind::LiteralFalse,
        "null_literal" => TokenKind::LiteralNull,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "package com.acme.widget;\n\nimport java.util.List;\nimport static java.awt.Button.ABORT;\n\npublic class Widget {\n    private int count = 3;\n}\n";

    #[test]
    fn parses_compilation_unit() {
        let tree = parse(SAMPLE, ParseOptions::default()).unwrap();
        assert_eq!(tree.kind(tree.root()), TokenKind::CompilationUnit);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn captures_package_name() {
        let tree = parse(SAMPLE, ParseOptions::default()).unwrap();
        let pkg = tree
            .preorder()
            .into_iter()
            .find(|n| tree.kind(*n) == TokenKind::PackageDef)
            .unwrap();
        assert_eq!(tree.text(pkg), Some("com.acme.widget"));
    }

    #[test]
    fn distinguishes_static_imports() {
        let tree = parse(SAMPLE, ParseOptions::default()).unwrap();
        let kinds: Vec<(TokenKind, String)> = tree
            .preorder()
            .into_iter()
            .filter(|n| {
                matches!(
                    tree.kind(*n),
                    TokenKind::Import | TokenKind::StaticImport
                )
            })
            .map(|n| (tree.kind(n), tree.text(n).unwrap_or_default().to_string()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Import, "java.util.List".to_string()),
                (TokenKind::StaticImport, "java.awt.Button.ABORT".to_string()),
            ]
        );
    }

    #[test]
    fn on_demand_import_keeps_wildcard() {
        let src = "import java.util.*;\nclass A {}\n";
        let tree = parse(src, ParseOptions::default()).unwrap();
        let import = tree
            .preorder()
            .into_iter()
            .find(|n| tree.kind(*n) == TokenKind::Import)
            .unwrap();
        assert_eq!(tree.text(import), Some("java.util.*"));
    }

    #[test]
    fn positions_are_one_based() {
        let tree = parse(SAMPLE, ParseOptions::default()).unwrap();
        let import = tree
            .preorder()
            .into_iter()
            .find(|n| tree.kind(*n) == TokenKind::Import)
            .unwrap();
        assert_eq!(tree.line(import), 3);
        assert_eq!(tree.column(import), 1);
    }

    #[test]
    fn malformed_source_reports_position() {
        let err = parse("class {", ParseOptions::default()).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.column >= 1);
    }

    #[test]
    fn comments_excluded_by_default() {
        let src = "// header\nclass A {}\n";
        let tree = parse(src, ParseOptions::default()).unwrap();
        assert!(tree
            .preorder()
            .into_iter()
            .all(|n| tree.kind(n) != TokenKind::SingleLineComment));
    }

    #[test]
    fn comments_included_on_request() {
        let src = "// header\nclass A {}\n";
        let options = ParseOptions {
            include_comments: true,
            ..ParseOptions::default()
        };
        let tree = parse(src, options).unwrap();
        let comment = tree
            .preorder()
            .into_iter()
            .find(|n| tree.kind(*n) == TokenKind::SingleLineComment)
            .unwrap();
        assert_eq!(tree.text(comment), Some("// header"));
        assert_eq!(tree.line(comment), 1);
    }

    #[test]
    fn javadoc_reparse_has_own_coordinate_space() {
        let tree = parse_javadoc(" Returns the widget count.\n @param name the widget name\n @return the count\n");
        assert_eq!(tree.kind(tree.root()), TokenKind::Javadoc);
        assert_eq!(tree.line(tree.root()), 1);

        let tags: Vec<&str> = tree
            .preorder()
            .into_iter()
            .filter(|n| tree.kind(*n) == TokenKind::JavadocTag)
            .filter_map(|n| tree.text(n))
            .collect();
        assert_eq!(tags, vec!["@param", "@return"]);

        let param = tree
            .preorder()
            .into_iter()
            .find(|n| tree.text(*n) == Some("@param"))
            .unwrap();
        // Line 2 of the comment body, not of any enclosing file.
        assert_eq!(tree.line(param), 2);
    }
}
