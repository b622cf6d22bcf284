//! Errors raised by the analyser

use crate::parsers::ParseError;
use thiserror::Error;

/// Errors that can occur during an analysis call
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Single-source parse failure, message unchanged
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Batch parse failure, attributed to the source that caused it
    #[error("{path}: {source}")]
    Unit {
        path: String,
        #[source]
        source: ParseError,
    },

    /// Scoring engine failure, passed through as-is
    #[error(transparent)]
    Scoring(anyhow::Error),
}

impl AnalysisError {
    pub(crate) fn unit(path: impl Into<String>, source: ParseError) -> Self {
        Self::Unit {
            path: path.into(),
            source,
        }
    }

    /// Path of the failing source, for batch failures.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Unit { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The underlying parse error, if this was a parse failure.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) | Self::Unit { source: e, .. } => Some(e),
            Self::Scoring(_) => None,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
