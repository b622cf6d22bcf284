//! Core data models for analysis input and parsed output

use serde::{Deserialize, Serialize};

/// One named piece of source text.
///
/// `path` is never resolved or checked; it only identifies the source in
/// errors and in the parsed output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: String,
    pub code: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

/// A source that parsed successfully, ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUnit<T> {
    pub path: String,
    pub tree: T,
}

impl<T> ParsedUnit<T> {
    pub fn new(path: impl Into<String>, tree: T) -> Self {
        Self {
            path: path.into(),
            tree,
        }
    }
}

/// What the analyser was given: a batch of named sources or one raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Batch(&'a [SourceUnit]),
    Single(&'a str),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(code: &'a str) -> Self {
        Self::Single(code)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(code: &'a String) -> Self {
        Self::Single(code.as_str())
    }
}

impl<'a> From<&'a [SourceUnit]> for Input<'a> {
    fn from(sources: &'a [SourceUnit]) -> Self {
        Self::Batch(sources)
    }
}

impl<'a> From<&'a Vec<SourceUnit>> for Input<'a> {
    fn from(sources: &'a Vec<SourceUnit>) -> Self {
        Self::Batch(sources.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [SourceUnit; N]> for Input<'a> {
    fn from(sources: &'a [SourceUnit; N]) -> Self {
        Self::Batch(sources.as_slice())
    }
}
