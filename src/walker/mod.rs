//! Walking strategies: how a scoring engine traverses a tree
//!
//! The analyser never walks trees itself; it hands a [`WalkingStrategy`] to
//! the engine alongside the trees. [`SyntaxWalker`] matches the trees built
//! by [`JavascriptBuilder`](crate::JavascriptBuilder).

use crate::parsers::dialect::is_function_like;
use crate::parsers::SyntaxTree;
use tree_sitter::Node;

/// Traverses trees of type `T`, reporting to a [`Visitor`].
pub trait WalkingStrategy<T: ?Sized> {
    fn walk(&self, tree: &T, visitor: &mut dyn Visitor);
}

impl<T: ?Sized, W: WalkingStrategy<T> + ?Sized> WalkingStrategy<T> for &W {
    fn walk(&self, tree: &T, visitor: &mut dyn Visitor) {
        (**self).walk(tree, visitor)
    }
}

/// Callbacks invoked during a walk. All default to no-ops.
pub trait Visitor {
    /// Called before a node's children are visited.
    fn enter(&mut self, _node: Node<'_>, _source: &str) {}

    /// Called after a node's children are visited.
    fn leave(&mut self, _node: Node<'_>, _source: &str) {}

    /// A function-like node is about to be entered.
    fn create_scope(&mut self, _scope: &Scope) {}

    /// The innermost scope has been left.
    fn pop_scope(&mut self) {}
}

/// A function, method, arrow or generator encountered during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Derived name, `<anonymous>` when none can be found
    pub name: String,
    /// tree-sitter node kind
    pub kind: &'static str,
    pub line_start: usize,
    pub line_end: usize,
    pub param_count: usize,
}

impl Scope {
    pub const ANONYMOUS: &'static str = "<anonymous>";

    fn from_node(node: Node<'_>, source: &str) -> Self {
        Self {
            name: scope_name(node, source).unwrap_or_else(|| Self::ANONYMOUS.to_string()),
            kind: node.kind(),
            line_start: node.start_position().row + 1,
            line_end: node.end_position().row + 1,
            param_count: param_count(node),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == Self::ANONYMOUS
    }
}

/// Depth-first walker over [`SyntaxTree`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxWalker {
    include_anonymous: bool,
}

impl SyntaxWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also report anonymous nodes (punctuation, keywords, operators).
    pub fn with_anonymous(mut self) -> Self {
        self.include_anonymous = true;
        self
    }

    fn reports(&self, node: Node<'_>) -> bool {
        self.include_anonymous || node.is_named()
    }

    fn opens_scope(node: Node<'_>) -> bool {
        node.is_named() && is_function_like(node.kind())
    }

    fn on_enter(&self, node: Node<'_>, source: &str, visitor: &mut dyn Visitor) {
        if Self::opens_scope(node) {
            visitor.create_scope(&Scope::from_node(node, source));
        }
        if self.reports(node) {
            visitor.enter(node, source);
        }
    }

    fn on_leave(&self, node: Node<'_>, source: &str, visitor: &mut dyn Visitor) {
        if self.reports(node) {
            visitor.leave(node, source);
        }
        if Self::opens_scope(node) {
            visitor.pop_scope();
        }
    }
}

impl WalkingStrategy<SyntaxTree> for SyntaxWalker {
    fn walk(&self, tree: &SyntaxTree, visitor: &mut dyn Visitor) {
        let source = tree.source();
        let mut cursor = tree.root_node().walk();

        loop {
            self.on_enter(cursor.node(), source, visitor);
            if cursor.goto_first_child() {
                continue;
            }

            loop {
                self.on_leave(cursor.node(), source, visitor);
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

/// Name a function node the way a reader would refer to it.
fn scope_name(node: Node<'_>, source: &str) -> Option<String> {
    let text = |n: Node<'_>| n.utf8_text(source.as_bytes()).ok().map(str::to_string);

    if let Some(name) = node.child_by_field_name("name") {
        return text(name);
    }

    // const add = (a, b) => a + b;  /  obj = { add: function () {} }
    let parent = node.parent()?;
    match parent.kind() {
        "variable_declarator" => parent.child_by_field_name("name").and_then(text),
        "pair" => parent.child_by_field_name("key").and_then(text),
        "assignment_expression" => parent.child_by_field_name("left").and_then(text),
        "field_definition" | "public_field_definition" => parent
            .child_by_field_name("property")
            .or_else(|| parent.child_by_field_name("name"))
            .and_then(text),
        _ => None,
    }
}

fn param_count(node: Node<'_>) -> usize {
    if let Some(params) = node.child_by_field_name("parameters") {
        return params.named_child_count();
    }
    // x => x
    usize::from(node.child_by_field_name("parameter").is_some())
}
