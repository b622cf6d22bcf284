//! JavaScript/TypeScript tree builder using tree-sitter
//!
//! Produces a [`SyntaxTree`] that owns its source text, so trees can be
//! handed to a scoring engine after the caller's buffers are gone.

use super::dialect::DialectRules;
use super::{DialectOptions, Grammar, ParseError, TreeBuilder};
use tree_sitter::{Node, Parser, Tree};

/// Tree builder backed by the tree-sitter JavaScript and TypeScript grammars.
///
/// Stateless: a parser is created per call, so one builder can be shared
/// across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavascriptBuilder;

impl JavascriptBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl TreeBuilder for JavascriptBuilder {
    type Tree = SyntaxTree;

    fn build(&self, code: &str, dialect: &DialectOptions) -> Result<SyntaxTree, ParseError> {
        let grammar = Grammar::for_dialect(dialect);
        let rules = DialectRules::new(grammar, dialect)?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(code, None).ok_or(ParseError::Aborted)?;
        let errors = rules.check(tree.root_node(), code);

        if !dialect.is_tolerant() {
            if let Some(first) = errors.first() {
                return Err(first.clone());
            }
        }

        tracing::trace!(
            "Parsed {} bytes as {:?} ({} tolerated errors)",
            code.len(),
            grammar,
            errors.len()
        );

        Ok(SyntaxTree {
            source: code.to_string(),
            tree,
            grammar,
            errors,
        })
    }
}

/// A parsed source: the tree-sitter tree together with the text it indexes.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    tree: Tree,
    grammar: Grammar,
    errors: Vec<ParseError>,
}

impl SyntaxTree {
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Errors recorded in tolerant mode. Always empty otherwise.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Source text covered by a node of this tree.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }

    /// S-expression of the whole tree, mostly for tests and debugging.
    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        self.grammar == other.grammar
            && self.source == other.source
            && self.errors == other.errors
            && self.to_sexp() == other.to_sexp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EcmaFeatures, SourceType};

    fn dialect() -> DialectOptions {
        DialectOptions {
            loc: true,
            ..Default::default()
        }
    }

    fn with_features(features: &[(&str, bool)]) -> DialectOptions {
        DialectOptions {
            ecma_features: Some(features.iter().copied().collect::<EcmaFeatures>()),
            ..dialect()
        }
    }

    fn with_version(version: u32) -> DialectOptions {
        DialectOptions {
            ecma_version: Some(version),
            ..dialect()
        }
    }

    fn with_module(version: u32) -> DialectOptions {
        DialectOptions {
            source_type: Some(SourceType::Module),
            ..with_version(version)
        }
    }

    fn build(code: &str, dialect: &DialectOptions) -> Result<SyntaxTree, ParseError> {
        JavascriptBuilder::new().build(code, dialect)
    }

    #[test]
    fn test_parse_simple_program() {
        let tree = build("console.log(1);", &dialect()).unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert_eq!(tree.grammar(), Grammar::JavaScript);
        assert_eq!(tree.source(), "console.log(1);");
        assert!(tree.errors().is_empty());
        assert!(tree.to_sexp().contains("call_expression"));
    }

    #[test]
    fn test_syntax_error_has_line() {
        let err = build("foo foo", &dialect()).unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(err.to_string().starts_with("Line 1: "), "got {}", err);
    }

    #[test]
    fn test_syntax_error_on_later_line() {
        let err = build("var a = 1;\nvar b = ;\n", &dialect()).unwrap_err();
        assert_eq!(err.line(), Some(2), "got {}", err);
    }

    #[test]
    fn test_syntax_error_points_at_offending_token() {
        let err = build("foo foo", &dialect()).unwrap_err();
        assert_eq!(err.description(), Some("Unexpected identifier"));
        assert_eq!(err.column(), Some(5));

        let err = build("var = 1;", &dialect()).unwrap_err();
        assert_eq!(err.description(), Some("Unexpected token ="));
        assert_eq!(err.column(), Some(5));
    }

    #[test]
    fn test_truncated_source_is_end_of_input() {
        let err = build("1 +", &dialect()).unwrap_err();
        assert_eq!(err.to_string(), "Line 1: Unexpected end of input");
        assert_eq!(err.column(), Some(4));

        let err = build("x = {", &dialect()).unwrap_err();
        assert_eq!(err.to_string(), "Line 1: Unexpected end of input");
    }

    #[test]
    fn test_tolerant_records_errors() {
        let tolerant = DialectOptions {
            tolerant: Some(true),
            ..dialect()
        };
        let tree = build("foo foo", &tolerant).unwrap();
        assert!(!tree.errors().is_empty());
        assert_eq!(tree.errors()[0].line(), Some(1));
    }

    #[test]
    fn test_script_rejects_import() {
        let err = build("import x from 'x';", &dialect()).unwrap_err();
        assert_eq!(err.to_string(), "Line 1: Unexpected token import");
    }

    #[test]
    fn test_module_accepts_import_and_export() {
        let module = DialectOptions {
            source_type: Some(SourceType::Module),
            ..dialect()
        };
        let tree = build("import x from 'x';\nexport default x;", &module).unwrap();
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn test_es5_rejects_arrow_function() {
        let err = build("var f = (a) => a;", &with_version(5)).unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(build("var f = (a) => a;", &with_version(6)).is_ok());
    }

    #[test]
    fn test_es5_accepts_function_expression() {
        let tree = build("var f = function (a) { return a; };", &with_version(5)).unwrap();
        assert!(tree.errors().is_empty());
    }

    #[test]
    fn test_exponent_needs_2016() {
        let err = build("var x = a ** b;", &with_version(2015)).unwrap_err();
        assert_eq!(err.description(), Some("Unexpected token **"));
        assert!(build("var x = a ** b;", &with_version(2016)).is_ok());
    }

    #[test]
    fn test_optional_chaining_needs_2020() {
        assert!(build("a?.b;", &with_version(2019)).is_err());
        assert!(build("a?.b;", &with_version(2020)).is_ok());
    }

    #[test]
    fn test_async_function_needs_2017() {
        let code = "async function f() { await g(); }";
        assert!(build(code, &with_version(2016)).is_err());
        assert!(build(code, &with_version(8)).is_ok());
    }

    #[test]
    fn test_es5_rejects_es2015_object_and_loop_syntax() {
        let cases = [
            ("for (var x of xs) {}", "Unexpected identifier"),
            ("var o = {a};", "Unexpected token }"),
            ("function f(a = 1) { return a; }", "Unexpected token ="),
            ("var o = {[k]: 1};", "Unexpected token ["),
            ("var o = { f() {} };", "Unexpected token ("),
        ];
        for (code, description) in cases {
            let err = build(code, &with_version(5)).unwrap_err();
            assert_eq!(err.description(), Some(description), "{}", code);
            assert!(build(code, &with_version(6)).is_ok(), "{}", code);
        }
    }

    #[test]
    fn test_es5_accepts_accessors() {
        let code = "var o = { get x() { return 1; }, set x(v) {} };";
        assert!(build(code, &with_version(5)).is_ok());
    }

    #[test]
    fn test_for_await_needs_2018() {
        let code = "async function f() { for await (const x of xs) {} }";
        assert!(build(code, &with_version(2017)).is_err());
        assert!(build(code, &with_version(2018)).is_ok());
    }

    #[test]
    fn test_import_meta_needs_module() {
        let err = build("var u = import.meta.url;", &dialect()).unwrap_err();
        assert_eq!(err.description(), Some("Unexpected token import"));
        assert!(build("var u = import.meta.url;", &with_module(2020)).is_ok());
    }

    #[test]
    fn test_module_rejects_with() {
        let code = "with (o) { x; }";
        assert!(build(code, &dialect()).is_ok());

        let err = build(code, &with_module(2015)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Line 1: Strict mode code may not include a with statement"
        );
    }

    #[test]
    fn test_invalid_version() {
        let err = build("1;", &with_version(4)).unwrap_err();
        assert_eq!(err, ParseError::InvalidVersion(4));
    }

    #[test]
    fn test_jsx_requires_feature() {
        let code = "var el = <div />;";
        let err = build(code, &dialect()).unwrap_err();
        assert_eq!(err.description(), Some("Unexpected token <"));
        assert!(build(code, &with_features(&[("jsx", true)])).is_ok());
    }

    #[test]
    fn test_global_return() {
        let err = build("return 1;", &dialect()).unwrap_err();
        assert_eq!(err.description(), Some("Illegal return statement"));
        assert!(build("return 1;", &with_features(&[("globalReturn", true)])).is_ok());
        assert!(build("function f() { return 1; }", &dialect()).is_ok());
        assert!(build("var f = () => { return 1; };", &dialect()).is_ok());
    }

    #[test]
    fn test_typescript_feature_selects_grammar() {
        let code = "function f(a: number): number { return a; }";
        assert!(build(code, &dialect()).is_err());

        let tree = build(code, &with_features(&[("typescript", true)])).unwrap();
        assert_eq!(tree.grammar(), Grammar::TypeScript);
    }

    #[test]
    fn test_text_and_line_count() {
        let tree = build("var a = 1;\nvar b = 2;\n", &dialect()).unwrap();
        let first = tree.root_node().named_child(0).unwrap();
        assert_eq!(tree.text(first), "var a = 1;");
        assert_eq!(tree.line_count(), 2);
    }

    #[test]
    fn test_same_input_builds_equal_trees() {
        let a = build("x + 1;", &dialect()).unwrap();
        let b = build("x + 1;", &dialect()).unwrap();
        assert_eq!(a, b);
    }
}
