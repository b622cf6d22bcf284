//! Scoring engine interface
//!
//! The analyser does not compute metrics. It hands parsed trees, the walking
//! strategy and the caller's options to a [`ScoringEngine`] and returns
//! whatever report comes back.
//!
//! # Example
//!
//! ```rust,ignore
//! struct FunctionCounter;
//!
//! impl ScoringEngine<SyntaxTree, SyntaxWalker> for FunctionCounter {
//!     type Report = usize;
//!
//!     fn score_project(&self, units: Vec<ParsedUnit<SyntaxTree>>, walker: &SyntaxWalker, options: &AnalysisOptions) -> anyhow::Result<usize> {
//!         units.into_iter().map(|u| self.score_module(u.tree, walker, options)).sum()
//!     }
//!
//!     fn score_module(&self, tree: SyntaxTree, walker: &SyntaxWalker, _options: &AnalysisOptions) -> anyhow::Result<usize> {
//!         let mut counter = ScopeCounter::default();
//!         walker.walk(&tree, &mut counter);
//!         Ok(counter.0)
//!     }
//! }
//! ```

use crate::config::AnalysisOptions;
use crate::models::ParsedUnit;
use anyhow::Result;

/// Computes a report from parsed trees of type `T`, walked with `W`.
///
/// Errors are opaque to the analyser and reach the caller unchanged.
pub trait ScoringEngine<T, W: ?Sized> {
    type Report;

    /// Score a batch of named trees. `units` keeps input order and may be empty.
    fn score_project(
        &self,
        units: Vec<ParsedUnit<T>>,
        walker: &W,
        options: &AnalysisOptions,
    ) -> Result<Self::Report>;

    /// Score a single tree with no path attached.
    fn score_module(&self, tree: T, walker: &W, options: &AnalysisOptions) -> Result<Self::Report>;
}

impl<T, W: ?Sized, S: ScoringEngine<T, W> + ?Sized> ScoringEngine<T, W> for &S {
    type Report = S::Report;

    fn score_project(
        &self,
        units: Vec<ParsedUnit<T>>,
        walker: &W,
        options: &AnalysisOptions,
    ) -> Result<Self::Report> {
        (**self).score_project(units, walker, options)
    }

    fn score_module(&self, tree: T, walker: &W, options: &AnalysisOptions) -> Result<Self::Report> {
        (**self).score_module(tree, walker, options)
    }
}
