//! Error types for result aggregation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Errors that stop an aggregation outright.
///
/// Problems inside individual cases are diagnostics, not errors; these cover
/// the test directory itself and writing the output.
#[derive(Debug)]
#[non_exhaustive]
pub enum AggregateError {
    /// Listing the test directory or writing the output failed.
    Io { path: PathBuf, source: io::Error },

    /// The dataset could not be serialized.
    Serialize { source: serde_json::Error },

    /// Output was requested from a scan with fatal diagnostics.
    Broken { fatal: usize },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialize { source } => write!(f, "failed to serialize dataset: {source}"),
            Self::Broken { fatal } => {
                write!(f, "refusing to write output: {fatal} fatal diagnostics")
            }
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source } => Some(source),
            Self::Broken { .. } => None,
        }
    }
}

/// A line of a text artifact that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// One-based line number.
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl std::error::Error for ParseError {}
