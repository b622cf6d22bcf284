//! Analysis orchestration
//!
//! Turns caller input into scoring-engine input:
//! 1. Dispatch on batch vs. single input
//! 2. Build one tree per source, applying the failure policy per source
//! 3. Hand the trees, the walker and the options to the scoring engine
//!
//! # Failure policy (batch mode)
//!
//! By default the first source that fails to parse aborts the batch and the
//! error is prefixed with that source's path. With `ignoreErrors` the source
//! is dropped and the rest of the batch continues. Single mode has no path to
//! attribute and nothing to protect, so parse errors pass through unchanged.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::AnalysisOptions;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Input, ParsedUnit, SourceUnit};
use crate::parsers::{DialectOptions, TreeBuilder};
use crate::scoring::ScoringEngine;

/// Wires a tree builder, a walking strategy and a scoring engine together.
///
/// Holds no per-call state: the same analyser can serve any number of calls.
#[derive(Debug, Clone)]
pub struct Analyser<B, W, S> {
    builder: B,
    walker: W,
    engine: S,
}

impl<B, W, S> Analyser<B, W, S> {
    pub fn new(builder: B, walker: W, engine: S) -> Self {
        Self {
            builder,
            walker,
            engine,
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn walker(&self) -> &W {
        &self.walker
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }
}

impl<B, W, S> Analyser<B, W, S>
where
    B: TreeBuilder,
    S: ScoringEngine<B::Tree, W>,
{
    /// Analyse a batch of sources or a single raw text.
    pub fn analyse<'a>(
        &self,
        input: impl Into<Input<'a>>,
        options: &AnalysisOptions,
    ) -> AnalysisResult<S::Report> {
        match input.into() {
            Input::Batch(sources) => self.analyse_sources(sources, options),
            Input::Single(code) => self.analyse_source(code, options),
        }
    }

    /// Analyse named sources, strictly in input order.
    pub fn analyse_sources(
        &self,
        sources: &[SourceUnit],
        options: &AnalysisOptions,
    ) -> AnalysisResult<S::Report> {
        debug!("Analysing {} sources", sources.len());
        let dialect = DialectOptions::from_analysis(options);

        let mut units = Vec::with_capacity(sources.len());
        for source in sources {
            if let Some(unit) = parse_unit(&self.builder, &dialect, options, source)? {
                units.push(unit);
            }
        }

        self.score_units(units, sources.len(), options)
    }

    /// Analyse one raw text. Parse errors are returned unchanged.
    pub fn analyse_source(&self, code: &str, options: &AnalysisOptions) -> AnalysisResult<S::Report> {
        let dialect = DialectOptions::from_analysis(options);
        let tree = self.builder.build(code, &dialect)?;

        self.engine
            .score_module(tree, &self.walker, options)
            .map_err(AnalysisError::Scoring)
    }

    fn score_units(
        &self,
        units: Vec<ParsedUnit<B::Tree>>,
        total: usize,
        options: &AnalysisOptions,
    ) -> AnalysisResult<S::Report> {
        if units.len() < total {
            debug!("Scoring {} of {} sources", units.len(), total);
        }

        self.engine
            .score_project(units, &self.walker, options)
            .map_err(AnalysisError::Scoring)
    }
}

impl<B, W, S> Analyser<B, W, S>
where
    B: TreeBuilder + Sync,
    B::Tree: Send,
    S: ScoringEngine<B::Tree, W>,
{
    /// Like [`analyse_sources`](Self::analyse_sources), parsing on the rayon pool.
    ///
    /// Output order matches the input, and under the default policy the
    /// reported failure is the first failing source in input order. Sources
    /// after it may still have been parsed.
    pub fn analyse_sources_parallel(
        &self,
        sources: &[SourceUnit],
        options: &AnalysisOptions,
    ) -> AnalysisResult<S::Report> {
        debug!("Analysing {} sources in parallel", sources.len());
        let dialect = DialectOptions::from_analysis(options);
        // Only the builder crosses threads; walker and engine stay on this one
        let builder = &self.builder;

        let parsed: Vec<AnalysisResult<Option<ParsedUnit<B::Tree>>>> = sources
            .par_iter()
            .map(|source| parse_unit(builder, &dialect, options, source))
            .collect();

        // Sequential pass so the earliest failure wins, not the fastest
        let units = parsed
            .into_iter()
            .collect::<AnalysisResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        self.score_units(units, sources.len(), options)
    }
}

/// Parse one source under the batch failure policy.
///
/// `Ok(None)` means the source failed and `ignore_errors` dropped it.
fn parse_unit<B: TreeBuilder>(
    builder: &B,
    dialect: &DialectOptions,
    options: &AnalysisOptions,
    source: &SourceUnit,
) -> AnalysisResult<Option<ParsedUnit<B::Tree>>> {
    match builder.build(&source.code, dialect) {
        Ok(tree) => {
            debug!("Parsed {}", source.path);
            Ok(Some(ParsedUnit::new(source.path.clone(), tree)))
        }
        Err(e) if options.ignore_errors => {
            warn!("Skipping {}: {}", source.path, e);
            Ok(None)
        }
        Err(e) => Err(AnalysisError::unit(source.path.clone(), e)),
    }
}
