//! Tree builders: turn source text into syntax trees
//!
//! [`TreeBuilder`] is the seam the analyser parses through. The tree-sitter
//! implementation lives in [`javascript`]; dialect rules it enforces on top of
//! the raw grammar live in [`dialect`].

pub mod dialect;
mod javascript;

pub use javascript::{JavascriptBuilder, SyntaxTree};

use crate::config::{AnalysisOptions, EcmaFeatures, SourceType};
use thiserror::Error;

/// Builds one syntax tree from one piece of source text.
pub trait TreeBuilder {
    type Tree;

    /// Parse `code` under the given dialect.
    fn build(&self, code: &str, dialect: &DialectOptions) -> Result<Self::Tree, ParseError>;
}

impl<B: TreeBuilder + ?Sized> TreeBuilder for &B {
    type Tree = B::Tree;

    fn build(&self, code: &str, dialect: &DialectOptions) -> Result<Self::Tree, ParseError> {
        (**self).build(code, dialect)
    }
}

/// Options handed to a [`TreeBuilder`] for every parse.
///
/// `loc` is always true when built from [`AnalysisOptions`]; the other four
/// fields are copied from the caller's `ecmaOptions` without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectOptions {
    pub loc: bool,
    pub ecma_version: Option<u32>,
    pub source_type: Option<SourceType>,
    pub tolerant: Option<bool>,
    pub ecma_features: Option<EcmaFeatures>,
}

impl DialectOptions {
    pub fn from_analysis(options: &AnalysisOptions) -> Self {
        let ecma = options.ecma_options.as_ref();
        Self {
            loc: true,
            ecma_version: ecma.and_then(|e| e.ecma_version),
            source_type: ecma.and_then(|e| e.source_type),
            tolerant: ecma.and_then(|e| e.tolerant),
            ecma_features: ecma.and_then(|e| e.ecma_features.clone()),
        }
    }

    pub fn is_tolerant(&self) -> bool {
        self.tolerant.unwrap_or(false)
    }

    pub fn feature(&self, name: &str) -> bool {
        self.ecma_features
            .as_ref()
            .is_some_and(|features| features.is_enabled(name))
    }
}

/// Grammar a tree was parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Grammar {
    /// Pick the grammar for a dialect from its `typescript` and `jsx` flags.
    pub fn for_dialect(dialect: &DialectOptions) -> Self {
        match (dialect.feature("typescript"), dialect.feature("jsx")) {
            (true, true) => Self::Tsx,
            (true, false) => Self::TypeScript,
            (false, _) => Self::JavaScript,
        }
    }

    fn language(&self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Failure to turn source text into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed source. `line` and `column` are 1-based, `index` is a byte offset.
    #[error("Line {line}: {description}")]
    Syntax {
        line: usize,
        column: usize,
        index: usize,
        description: String,
    },

    #[error("Invalid ecmaVersion: {0}")]
    InvalidVersion(u32),

    #[error("Failed to load grammar: {0}")]
    Language(String),

    #[error("Parser returned no tree")]
    Aborted,
}

impl ParseError {
    pub fn syntax(line: usize, column: usize, index: usize, description: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            index,
            description: description.into(),
        }
    }

    /// 1-based line of a syntax error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// 1-based column of a syntax error.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Syntax { column, .. } => Some(*column),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Syntax { description, .. } => Some(description),
            _ => None,
        }
    }
}
