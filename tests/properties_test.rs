//! Property-based tests for batch ordering and failure attribution

use escomplex_js::{
    AnalysisOptions, Analyser, DialectOptions, ParseError, ParsedUnit, ScoringEngine, SourceUnit,
    TreeBuilder,
};
use proptest::prelude::*;
use std::cell::RefCell;

/// Records every code it is asked to build; code starting with `!` fails.
#[derive(Default)]
struct Builder {
    seen: RefCell<Vec<String>>,
}

impl TreeBuilder for Builder {
    type Tree = String;

    fn build(&self, code: &str, dialect: &DialectOptions) -> Result<String, ParseError> {
        assert!(dialect.loc, "position info must always be requested");
        self.seen.borrow_mut().push(code.to_string());
        if code.starts_with('!') {
            return Err(ParseError::syntax(1, 1, 0, "Unexpected token !"));
        }
        Ok(code.chars().rev().collect())
    }
}

#[derive(Default)]
struct Engine {
    batches: RefCell<Vec<Vec<ParsedUnit<String>>>>,
}

impl ScoringEngine<String, ()> for Engine {
    type Report = usize;

    fn score_project(
        &self,
        units: Vec<ParsedUnit<String>>,
        _walker: &(),
        _options: &AnalysisOptions,
    ) -> anyhow::Result<usize> {
        let len = units.len();
        self.batches.borrow_mut().push(units);
        Ok(len)
    }

    fn score_module(&self, _tree: String, _walker: &(), _options: &AnalysisOptions) -> anyhow::Result<usize> {
        Ok(1)
    }
}

fn analyser() -> Analyser<Builder, (), Engine> {
    Analyser::new(Builder::default(), (), Engine::default())
}

// Paths are unique so ordering checks are unambiguous
fn valid_sources() -> impl Strategy<Value = Vec<SourceUnit>> {
    prop::collection::vec("[a-z0-9 ;]{0,16}", 0..12).prop_map(|codes| {
        codes
            .into_iter()
            .enumerate()
            .map(|(i, code)| SourceUnit::new(format!("/src/{}.js", i), code))
            .collect()
    })
}

fn sources_with_failure() -> impl Strategy<Value = (Vec<SourceUnit>, usize)> {
    valid_sources()
        .prop_filter("need at least one source", |s| !s.is_empty())
        .prop_flat_map(|sources| {
            let len = sources.len();
            (Just(sources), 0..len)
        })
        .prop_map(|(mut sources, k)| {
            sources[k].code = format!("!{}", sources[k].code);
            (sources, k)
        })
}

proptest! {
    /// Property: every valid source is built once, in order, and scored together
    #[test]
    fn prop_valid_batch_preserves_order(sources in valid_sources()) {
        let analyser = analyser();

        let scored = analyser.analyse(&sources, &AnalysisOptions::default()).unwrap();

        let codes: Vec<String> = sources.iter().map(|s| s.code.clone()).collect();
        prop_assert_eq!(&*analyser.builder().seen.borrow(), &codes);
        prop_assert_eq!(scored, sources.len());

        let batches = analyser.engine().batches.borrow();
        prop_assert_eq!(batches.len(), 1);
        let paths: Vec<&str> = batches[0].iter().map(|u| u.path.as_str()).collect();
        let expected: Vec<&str> = sources.iter().map(|s| s.path.as_str()).collect();
        prop_assert_eq!(paths, expected);
    }

    /// Property: the first failure aborts the batch and names its source
    #[test]
    fn prop_failure_is_attributed((sources, k) in sources_with_failure()) {
        let analyser = analyser();

        let err = analyser.analyse(&sources, &AnalysisOptions::default()).unwrap_err();

        let prefix = format!("{}: ", sources[k].path);
        prop_assert!(err.to_string().starts_with(&prefix));
        prop_assert_eq!(analyser.builder().seen.borrow().len(), k + 1);
        prop_assert!(analyser.engine().batches.borrow().is_empty());
    }

    /// Property: with ignoreErrors the failing source is dropped and order is kept
    #[test]
    fn prop_ignored_failure_is_dropped((sources, k) in sources_with_failure()) {
        let analyser = analyser();
        let options = AnalysisOptions::new().ignoring_errors();

        let scored = analyser.analyse(&sources, &options).unwrap();

        prop_assert_eq!(scored, sources.len() - 1);
        prop_assert_eq!(analyser.builder().seen.borrow().len(), sources.len());

        let batches = analyser.engine().batches.borrow();
        prop_assert_eq!(batches.len(), 1);
        let paths: Vec<&str> = batches[0].iter().map(|u| u.path.as_str()).collect();
        let expected: Vec<&str> = sources
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != k)
            .map(|(_, s)| s.path.as_str())
            .collect();
        prop_assert_eq!(paths, expected);
    }

    /// Property: single mode builds once with the raw text and scores a bare tree
    #[test]
    fn prop_single_source_builds_once(code in "[a-z0-9 +;]{0,24}") {
        let analyser = analyser();

        let scored = analyser.analyse(code.as_str(), &AnalysisOptions::default()).unwrap();

        prop_assert_eq!(scored, 1);
        prop_assert_eq!(&*analyser.builder().seen.borrow(), &vec![code.clone()]);
        prop_assert!(analyser.engine().batches.borrow().is_empty());
    }
}
