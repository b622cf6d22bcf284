//! escomplex-js - source normalization for complexity analysis
//!
//! Takes one JavaScript source or a batch of named sources, turns each into a
//! syntax tree and hands the collected trees to a scoring engine.
//!
//! The parser and the engine sit behind traits ([`TreeBuilder`] and
//! [`ScoringEngine`]). A tree-sitter builder ([`JavascriptBuilder`]) and a
//! matching walker ([`SyntaxWalker`]) are provided; the engine is always
//! supplied by the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use escomplex_js::{analyse, AnalysisOptions, SourceUnit};
//!
//! let sources = vec![
//!     SourceUnit::new("/foo.js", "console.log(1);"),
//!     SourceUnit::new("/bar.js", "\"x\";"),
//! ];
//! let report = analyse(&sources, &AnalysisOptions::default(), &my_engine)?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod scoring;
pub mod walker;

/// Re-exported so visitors can name node types without a direct dependency.
pub use tree_sitter;

pub use config::{AnalysisOptions, EcmaFeatures, EcmaOptions, SourceType};
pub use error::{AnalysisError, AnalysisResult};
pub use models::{Input, ParsedUnit, SourceUnit};
pub use parsers::{DialectOptions, Grammar, JavascriptBuilder, ParseError, SyntaxTree, TreeBuilder};
pub use pipeline::Analyser;
pub use scoring::ScoringEngine;
pub use walker::{Scope, SyntaxWalker, Visitor, WalkingStrategy};

/// Analyse `input` with the tree-sitter builder and walker, scoring with `engine`.
pub fn analyse<'a, S>(
    input: impl Into<Input<'a>>,
    options: &AnalysisOptions,
    engine: &S,
) -> AnalysisResult<S::Report>
where
    S: ScoringEngine<SyntaxTree, SyntaxWalker> + ?Sized,
{
    Analyser::new(JavascriptBuilder::new(), SyntaxWalker::new(), engine).analyse(input, options)
}
