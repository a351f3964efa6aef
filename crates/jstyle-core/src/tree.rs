//! Arena-backed syntax tree model.
//!
//! A [`SyntaxTree`] owns all of its nodes in a flat arena addressed by
//! [`NodeId`]. Parent, child, and next-sibling links are indices into the
//! arena, so the structure is acyclic by construction and cheap to clone
//! references into. Tree shape is fixed once the builder finishes; node
//! payloads are read-only afterwards.

use std::fmt;

/// Discriminant tag of a syntax tree node.
///
/// This is a closed enumeration: the parser maps grammar productions onto
/// these kinds and splices out anything it has no mapping for, so checks can
/// match exhaustively and subscription tables stay total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum TokenKind {
    CompilationUnit,
    PackageDef,
    Import,
    StaticImport,
    ClassDef,
    InterfaceDef,
    EnumDef,
    AnnotationDef,
    ObjBlock,
    EnumConstantDef,
    MethodDef,
    CtorDef,
    FieldDef,
    VariableDef,
    ParameterDef,
    Modifiers,
    Annotation,
    TypeIdent,
    Ident,
    Slist,
    LiteralIf,
    LiteralElse,
    LiteralFor,
    LiteralWhile,
    LiteralDo,
    LiteralSwitch,
    CaseGroup,
    LiteralTry,
    LiteralCatch,
    LiteralFinally,
    LiteralReturn,
    LiteralThrow,
    LiteralNew,
    Expr,
    MethodCall,
    Assign,
    Dot,
    NumInt,
    NumFloat,
    StringLiteral,
    CharLiteral,
    LiteralTrue,
    LiteralFalse,
    LiteralNull,
    SingleLineComment,
    BlockComment,
    Javadoc,
    JavadocTag,
    JavadocText,
}

/// Every kind, in declaration order. Used for name lookup and for checks
/// that subscribe to "everything".
pub const ALL_TOKEN_KINDS: &[TokenKind] = &[
    TokenKind::CompilationUnit,
    TokenKind::PackageDef,
    TokenKind::Import,
    TokenKind::StaticImport,
    TokenKind::ClassDef,
    TokenKind::InterfaceDef,
    TokenKind::EnumDef,
    TokenKind::AnnotationDef,
    TokenKind::ObjBlock,
    TokenKind::EnumConstantDef,
    TokenKind::MethodDef,
    TokenKind::CtorDef,
    TokenKind::FieldDef,
    TokenKind::VariableDef,
    TokenKind::ParameterDef,
    TokenKind::Modifiers,
    TokenKind::Annotation,
    TokenKind::TypeIdent,
    TokenKind::Ident,
    TokenKind::Slist,
    TokenKind::LiteralIf,
    TokenKind::LiteralElse,
    TokenKind::LiteralFor,
    TokenKind::LiteralWhile,
    TokenKind::LiteralDo,
    TokenKind::LiteralSwitch,
    TokenKind::CaseGroup,
    TokenKind::LiteralTry,
    TokenKind::LiteralCatch,
    TokenKind::LiteralFinally,
    TokenKind::LiteralReturn,
    TokenKind::LiteralThrow,
    TokenKind::LiteralNew,
    TokenKind::Expr,
    TokenKind::MethodCall,
    TokenKind::Assign,
    TokenKind::Dot,
    TokenKind::NumInt,
    TokenKind::NumFloat,
    TokenKind::StringLiteral,
    TokenKind::CharLiteral,
    TokenKind::LiteralTrue,
    TokenKind::LiteralFalse,
    TokenKind::LiteralNull,
    TokenKind::SingleLineComment,
    TokenKind::BlockComment,
    TokenKind::Javadoc,
    TokenKind::JavadocTag,
    TokenKind::JavadocText,
];

impl TokenKind {
    /// Returns the canonical uppercase name used in tree diagrams and
    /// path queries (e.g. `CLASS_DEF`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CompilationUnit => "COMPILATION_UNIT",
            Self::PackageDef => "PACKAGE_DEF",
            Self::Import => "IMPORT",
            Self::StaticImport => "STATIC_IMPORT",
            Self::ClassDef => "CLASS_DEF",
            Self::InterfaceDef => "INTERFACE_DEF",
            Self::EnumDef => "ENUM_DEF",
            Self::AnnotationDef => "ANNOTATION_DEF",
            Self::ObjBlock => "OBJBLOCK",
            Self::EnumConstantDef => "ENUM_CONSTANT_DEF",
            Self::MethodDef => "METHOD_DEF",
            Self::CtorDef => "CTOR_DEF",
            Self::FieldDef => "FIELD_DEF",
            Self::VariableDef => "VARIABLE_DEF",
            Self::ParameterDef => "PARAMETER_DEF",
            Self::Modifiers => "MODIFIERS",
            Self::Annotation => "ANNOTATION",
            Self::TypeIdent => "TYPE_IDENT",
            Self::Ident => "IDENT",
            Self::Slist => "SLIST",
            Self::LiteralIf => "LITERAL_IF",
            Self::LiteralElse => "LITERAL_ELSE",
            Self::LiteralFor => "LITERAL_FOR",
            Self::LiteralWhile => "LITERAL_WHILE",
            Self::LiteralDo => "LITERAL_DO",
            Self::LiteralSwitch => "LITERAL_SWITCH",
            Self::CaseGroup => "CASE_GROUP",
            Self::LiteralTry => "LITERAL_TRY",
            Self::LiteralCatch => "LITERAL_CATCH",
            Self::LiteralFinally => "LITERAL_FINALLY",
            Self::LiteralReturn => "LITERAL_RETURN",
            Self::LiteralThrow => "LITERAL_THROW",
            Self::LiteralNew => "LITERAL_NEW",
            Self::Expr => "EXPR",
            Self::MethodCall => "METHOD_CALL",
            Self::Assign => "ASSIGN",
            Self::Dot => "DOT",
            Self::NumInt => "NUM_INT",
            Self::NumFloat => "NUM_FLOAT",
            Self::StringLiteral => "STRING_LITERAL",
            Self::CharLiteral => "CHAR_LITERAL",
            Self::LiteralTrue => "LITERAL_TRUE",
            Self::LiteralFalse => "LITERAL_FALSE",
            Self::LiteralNull => "LITERAL_NULL",
            Self::SingleLineComment => "SINGLE_LINE_COMMENT",
            Self::BlockComment => "BLOCK_COMMENT",
            Self::Javadoc => "JAVADOC",
            Self::JavadocTag => "JAVADOC_TAG",
            Self::JavadocText => "JAVADOC_TEXT",
        }
    }

    /// Resolves a canonical uppercase name back to a kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_TOKEN_KINDS.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of a node within its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: TokenKind,
    line: usize,
    column: usize,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
}

/// An immutable-shape syntax tree rooted at a single node.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Returns the root node. The root is the only node with no parent.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the kind tag of `node`.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> TokenKind {
        self.nodes[node.index()].kind
    }

    /// Returns the 1-based source line of `node`.
    #[must_use]
    pub fn line(&self, node: NodeId) -> usize {
        self.nodes[node.index()].line
    }

    /// Returns the 1-based source column of `node`.
    #[must_use]
    pub fn column(&self, node: NodeId) -> usize {
        self.nodes[node.index()].column
    }

    /// Returns the textual value attached to `node`, if any.
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.index()].text.as_deref()
    }

    /// Returns the parent of `node`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// Returns the ordered children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Returns the next sibling of `node`, if any.
    #[must_use]
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].next_sibling
    }

    /// Returns the text of the first direct `IDENT` child, if present.
    ///
    /// Declaration-like nodes carry their name this way.
    #[must_use]
    pub fn ident_of(&self, node: NodeId) -> Option<&str> {
        self.children(node)
            .iter()
            .find(|c| self.kind(**c) == TokenKind::Ident)
            .and_then(|c| self.text(*c))
    }

    /// Returns all nodes in depth-first pre-order, starting at the root.
    /// The order is deterministic: left-to-right over child lists.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        self.preorder_from(self.root())
    }

    /// Depth-first pre-order of the subtree rooted at `start`.
    #[must_use]
    pub fn preorder_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Returns every node whose position matches the given line and,
    /// when supplied, column. Document order.
    #[must_use]
    pub fn nodes_at(&self, line: usize, column: Option<usize>) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|n| self.line(*n) == line && column.map_or(true, |c| self.column(*n) == c))
            .collect()
    }

    /// Walks up from `node` looking for an ancestor of the given kind.
    #[must_use]
    pub fn ancestor_of_kind(&self, node: NodeId, kind: TokenKind) -> Option<NodeId> {
        let mut current = self.parent(node);
        while let Some(n) = current {
            if self.kind(n) == kind {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }
}

/// Builder used by the parser to assemble a [`SyntaxTree`].
///
/// Children are appended in document order; `finish` wires up the
/// next-sibling links.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Starts a tree with the given root node.
    #[must_use]
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self {
            nodes: vec![NodeData {
                kind,
                line,
                column,
                text: None,
                parent: None,
                children: Vec::new(),
                next_sibling: None,
            }],
        }
    }

    /// Returns the root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child under `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena outgrows `u32` indices; source files of that
    /// size are rejected by the parser long before this point.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        kind: TokenKind,
        line: usize,
        column: usize,
        text: Option<String>,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_else(|_| {
            panic!("syntax tree arena overflow at {} nodes", self.nodes.len())
        }));
        self.nodes.push(NodeData {
            kind,
            line,
            column,
            text,
            parent: Some(parent),
            children: Vec::new(),
            next_sibling: None,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Attaches a textual value to an existing node.
    pub fn set_text(&mut self, node: NodeId, text: String) {
        self.nodes[node.index()].text = Some(text);
    }

    /// Finalizes the tree, wiring next-sibling links.
    #[must_use]
    pub fn finish(mut self) -> SyntaxTree {
        for i in 0..self.nodes.len() {
            let children = self.nodes[i].children.clone();
            for pair in children.windows(2) {
                self.nodes[pair[0].index()].next_sibling = Some(pair[1]);
            }
        }
        SyntaxTree { nodes: self.nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SyntaxTree {
        let mut b = TreeBuilder::new(TokenKind::CompilationUnit, 1, 1);
        let root = b.root();
        let pkg = b.add_child(root, TokenKind::PackageDef, 1, 1, Some("com.acme".into()));
        let class = b.add_child(root, TokenKind::ClassDef, 3, 1, None);
        b.add_child(class, TokenKind::Ident, 3, 14, Some("Widget".into()));
        b.add_child(class, TokenKind::ObjBlock, 3, 21, None);
        let _ = pkg;
        b.finish()
    }

    #[test]
    fn root_has_no_parent() {
        let tree = sample_tree();
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn every_non_root_node_has_a_parent() {
        let tree = sample_tree();
        for node in tree.preorder() {
            if node != tree.root() {
                assert!(tree.parent(node).is_some());
            }
        }
    }

    #[test]
    fn preorder_is_left_to_right() {
        let tree = sample_tree();
        let kinds: Vec<TokenKind> = tree.preorder().iter().map(|n| tree.kind(*n)).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::CompilationUnit,
                TokenKind::PackageDef,
                TokenKind::ClassDef,
                TokenKind::Ident,
                TokenKind::ObjBlock,
            ]
        );
    }

    #[test]
    fn sibling_links_follow_child_order() {
        let tree = sample_tree();
        let root_children = tree.children(tree.root());
        assert_eq!(tree.next_sibling(root_children[0]), Some(root_children[1]));
        assert!(tree.next_sibling(root_children[1]).is_none());
    }

    #[test]
    fn ident_of_finds_declaration_name() {
        let tree = sample_tree();
        let class = tree.children(tree.root())[1];
        assert_eq!(tree.ident_of(class), Some("Widget"));
    }

    #[test]
    fn nodes_at_matches_line_and_column() {
        let tree = sample_tree();
        assert_eq!(tree.nodes_at(3, Some(14)).len(), 1);
        assert_eq!(tree.nodes_at(3, None).len(), 3);
        assert!(tree.nodes_at(9, None).is_empty());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ALL_TOKEN_KINDS {
            assert_eq!(TokenKind::from_name(kind.name()), Some(*kind));
        }
        assert!(TokenKind::from_name("NOT_A_KIND").is_none());
    }
}
