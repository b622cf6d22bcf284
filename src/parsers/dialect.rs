//! Dialect rules layered over the tree-sitter grammars
//!
//! tree-sitter always parses the newest syntax it knows. Editions, script vs.
//! module, JSX and top-level `return` are enforced here by walking the tree
//! once and reporting nodes the requested dialect does not allow.

use super::{DialectOptions, Grammar, ParseError};
use crate::config::SourceType;
use tree_sitter::Node;

/// Newest edition the grammars understand, used when no version is given.
pub const LATEST_EDITION: u16 = 2025;

/// Node kinds that open a function body.
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "function_expression",
    "function",
    "arrow_function",
    "generator_function_declaration",
    "generator_function",
    "method_definition",
];

/// Words reported as tokens rather than identifiers.
const RESERVED_WORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "return", "static",
    "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
    "yield",
];

/// Whether a node kind is a function, method, arrow or generator.
pub fn is_function_like(kind: &str) -> bool {
    FUNCTION_KINDS.contains(&kind)
}

/// Map an `ecmaVersion` (edition number or year) to its year.
///
/// Accepts 3, 5, 6..=16 and 2015..=2025. `None` means the latest edition.
pub fn edition_year(version: Option<u32>) -> Result<u16, ParseError> {
    match version {
        None => Ok(LATEST_EDITION),
        Some(3) => Ok(1999),
        Some(5) => Ok(2009),
        Some(v @ 6..=16) => Ok(2009 + v as u16),
        Some(v @ 2015..=2025) => Ok(v as u16),
        Some(v) => Err(ParseError::InvalidVersion(v)),
    }
}

/// Describe a single token's text.
pub fn describe_token(token: &str) -> String {
    let Some(first) = token.chars().next() else {
        return "Unexpected end of input".to_string();
    };

    if is_identifier_start(first) {
        if RESERVED_WORDS.contains(&token) {
            format!("Unexpected token {}", token)
        } else {
            "Unexpected identifier".to_string()
        }
    } else if first.is_ascii_digit() {
        "Unexpected number".to_string()
    } else if first == '"' || first == '\'' {
        "Unexpected string".to_string()
    } else if first == '`' {
        "Unexpected template string".to_string()
    } else {
        format!("Unexpected token {}", token)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Find the next token at or after `index`. Returns its byte offset and text.
///
/// Only as precise as error messages need: words and numbers are grouped,
/// quotes stand for the whole literal, anything else is a single character.
fn next_token(source: &str, index: usize) -> (usize, &str) {
    let rest = source.get(index..).unwrap_or("");
    let trimmed = rest.trim_start();
    let start = index + (rest.len() - trimmed.len());

    let Some(first) = trimmed.chars().next() else {
        return (start, "");
    };

    let len = if is_identifier_start(first) || first.is_ascii_digit() {
        trimmed
            .char_indices()
            .find(|(_, c)| !is_identifier_part(*c))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len())
    } else {
        first.len_utf8()
    };

    (start, &trimmed[..len])
}

/// 1-based line and column of a byte offset.
pub fn position_of(source: &str, index: usize) -> (usize, usize) {
    let before = source.get(..index).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, before.len() - line_start + 1)
}

/// Rules for one parse, resolved from the dialect options.
#[derive(Debug, Clone)]
pub(crate) struct DialectRules {
    grammar: Grammar,
    edition: u16,
    module: bool,
    jsx: bool,
    global_return: bool,
}

impl DialectRules {
    pub(crate) fn new(grammar: Grammar, dialect: &DialectOptions) -> Result<Self, ParseError> {
        Ok(Self {
            grammar,
            edition: edition_year(dialect.ecma_version)?,
            module: dialect.source_type == Some(SourceType::Module),
            jsx: dialect.feature("jsx"),
            global_return: dialect.feature("globalReturn"),
        })
    }

    /// Collect every syntax and dialect error in document order.
    pub(crate) fn check(&self, root: Node<'_>, source: &str) -> Vec<ParseError> {
        let mut errors = Vec::new();
        let mut cursor = root.walk();

        loop {
            let node = cursor.node();
            let mut descend = true;

            if node.is_error() || node.is_missing() {
                errors.push(recovery_error(node, source));
                descend = false;
            } else if let Some(err) = node
                .is_named()
                .then(|| self.check_node(node, source))
                .flatten()
            {
                // One report per JSX tree is enough
                descend = !self.is_rejected_jsx(node);
                errors.push(err);
            }

            if descend && cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return errors;
                }
            }
        }
    }

    fn check_node(&self, node: Node<'_>, source: &str) -> Option<ParseError> {
        let kind = node.kind();

        if !self.module
            && (matches!(kind, "import_statement" | "export_statement") || is_import_meta(node, source))
        {
            return Some(unexpected_node(node, source));
        }

        // Modules are always strict
        if self.module && kind == "with_statement" {
            return Some(error_at(
                source,
                node.start_byte(),
                "Strict mode code may not include a with statement".to_string(),
            ));
        }

        if self.is_rejected_jsx(node) {
            return Some(error_at(source, node.start_byte(), "Unexpected token <".to_string()));
        }

        if kind == "return_statement" && !self.global_return && !inside_function(node) {
            return Some(error_at(
                source,
                node.start_byte(),
                "Illegal return statement".to_string(),
            ));
        }

        if self.grammar == Grammar::JavaScript {
            if let Some(required) = minimum_edition(node, source) {
                if required > self.edition {
                    return Some(unexpected_node(node, source));
                }
            }
        }

        None
    }

    fn is_rejected_jsx(&self, node: Node<'_>) -> bool {
        self.grammar == Grammar::JavaScript
            && !self.jsx
            && matches!(node.kind(), "jsx_element" | "jsx_self_closing_element")
    }
}

/// Error for an ERROR or MISSING node left by tree-sitter's recovery.
fn recovery_error(node: Node<'_>, source: &str) -> ParseError {
    let index = if node.is_missing() {
        // Zero-width, placed where the absent token was expected
        node.start_byte()
    } else {
        offending_index(node, source)
    };
    syntax_error_at(source, index)
}

/// Byte offset of the token an ERROR node could not accept.
///
/// An ERROR running to the end of input on a token that needs a follow-up
/// (an operator, an opening bracket) is reported at the end of input. An ERROR
/// opening with a complete expression or a keyword holds a valid prefix, so
/// the fault is the token after that prefix. Otherwise the ERROR's own first
/// token is at fault.
fn offending_index(node: Node<'_>, source: &str) -> usize {
    let end = source.trim_end().len();
    if node.end_byte() >= end && awaits_more(last_leaf(node), source) {
        return end;
    }

    let Some(first) = node.child(0) else {
        return node.start_byte();
    };
    if !is_valid_prefix(first, source) {
        return node.start_byte();
    }

    if node.child_count() > 1 {
        first.end_byte()
    } else if !next_token(source, node.end_byte()).1.is_empty() {
        node.end_byte()
    } else {
        node.start_byte()
    }
}

fn is_valid_prefix(node: Node<'_>, source: &str) -> bool {
    if node.is_error() || node.is_missing() {
        return false;
    }
    node.is_named()
        || node
            .utf8_text(source.as_bytes())
            .ok()
            .and_then(|text| text.chars().next())
            .is_some_and(is_identifier_start)
}

/// Whether input may not stop right after this token.
fn awaits_more(leaf: Node<'_>, source: &str) -> bool {
    if leaf.is_missing() {
        return true;
    }
    if leaf.is_named() {
        return false;
    }
    let text = leaf.utf8_text(source.as_bytes()).unwrap_or("");
    !matches!(
        text,
        ")" | "]" | "}" | ";" | "\"" | "'" | "`" | "++" | "--" | "this" | "true" | "false" | "null"
            | "super" | "break" | "continue" | "debugger" | "return"
    )
}

fn syntax_error_at(source: &str, index: usize) -> ParseError {
    let (start, token) = next_token(source, index);
    error_at(source, start, describe_token(token))
}

fn error_at(source: &str, index: usize, description: String) -> ParseError {
    let (line, column) = position_of(source, index);
    ParseError::syntax(line, column, index, description)
}

/// Error pointing at the token that introduces a disallowed construct.
fn unexpected_node(node: Node<'_>, source: &str) -> ParseError {
    let token = match node.kind() {
        "binary_expression" | "augmented_assignment_expression" => node
            .child_by_field_name("operator")
            .unwrap_or(node),
        "for_in_statement" => token_child(node, "of").unwrap_or_else(|| first_leaf(node)),
        // Older editions stumble on the token after the name
        "shorthand_property_identifier" => return syntax_error_at(source, node.end_byte()),
        "assignment_pattern" | "method_definition" => {
            let field = if node.kind() == "assignment_pattern" { "left" } else { "name" };
            match node.child_by_field_name(field) {
                Some(prefix) => return syntax_error_at(source, prefix.end_byte()),
                None => first_leaf(node),
            }
        }
        _ => first_leaf(node),
    };
    let text = token.utf8_text(source.as_bytes()).unwrap_or("");
    error_at(source, token.start_byte(), describe_token(text))
}

fn first_leaf(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while let Some(child) = current.child(0) {
        current = child;
    }
    current
}

fn last_leaf(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while current.child_count() > 0 {
        match current.child(current.child_count() - 1) {
            Some(child) => current = child,
            None => break,
        }
    }
    current
}

/// `import.meta`, only valid in modules.
fn is_import_meta(node: Node<'_>, source: &str) -> bool {
    match node.kind() {
        "meta_property" => first_leaf(node).kind() == "import",
        // Grammars without `meta_property` parse it as a member access on `import`
        "member_expression" => {
            node.child_by_field_name("object").map(|o| o.kind()) == Some("import")
                && node
                    .child_by_field_name("property")
                    .and_then(|p| p.utf8_text(source.as_bytes()).ok())
                    == Some("meta")
        }
        _ => false,
    }
}

fn inside_function(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_function_like(parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Direct child token of the given kind, e.g. `async` or `of`.
fn token_child<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn has_token(node: Node<'_>, kind: &str) -> bool {
    token_child(node, kind).is_some()
}

/// Object literal methods other than `get`/`set` accessors.
fn is_shorthand_method(node: Node<'_>) -> bool {
    node.kind() == "method_definition"
        && node.parent().map(|p| p.kind()) == Some("object")
        && !has_token(node, "get")
        && !has_token(node, "set")
}

fn operator<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.child_by_field_name("operator")
        .and_then(|op| op.utf8_text(source.as_bytes()).ok())
        .unwrap_or("")
}

/// Edition year that introduced the syntax this node represents.
fn minimum_edition(node: Node<'_>, source: &str) -> Option<u16> {
    let base = match node.kind() {
        "arrow_function"
        | "class_declaration"
        | "class"
        | "lexical_declaration"
        | "template_string"
        | "spread_element"
        | "rest_pattern"
        | "generator_function_declaration"
        | "generator_function"
        | "yield_expression"
        | "import_statement"
        | "export_statement"
        | "object_pattern"
        | "array_pattern"
        | "meta_property"
        | "shorthand_property_identifier"
        | "assignment_pattern"
        | "computed_property_name" => Some(2015),
        "for_in_statement" if has_token(node, "await") => Some(2018),
        "for_in_statement" if has_token(node, "of") => Some(2015),
        "method_definition" if is_shorthand_method(node) => Some(2015),
        "await_expression" => Some(2017),
        "optional_chain" => Some(2020),
        "class_static_block" | "private_property_identifier" | "field_definition" => Some(2022),
        "binary_expression" => match operator(node, source) {
            "**" => Some(2016),
            "??" => Some(2020),
            _ => None,
        },
        "augmented_assignment_expression" => match operator(node, source) {
            "**=" => Some(2016),
            "&&=" | "||=" | "??=" => Some(2021),
            _ => None,
        },
        _ => None,
    };

    if is_function_like(node.kind()) && has_token(node, "async") {
        return Some(base.unwrap_or(0).max(2017));
    }

    base
}
