//! Structured diagnostics shared by the generator and the aggregator.
//!
//! Batch operations never stop at the first problem. They record
//! [`Diagnostic`]s as they go and hand the whole collection back, so an
//! operator sees every issue of a run at once and callers decide what a
//! fatal entry means for their output.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// How a diagnostic affects the run that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Noted for the operator; output is unaffected.
    Informational,
    /// The affected item was skipped or is suspect; the batch continues.
    Recoverable,
    /// The output of the batch must not be trusted or written.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Informational => "info",
            Self::Recoverable => "warning",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Machine-readable reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Reason {
    /// A case or coordinator directory could not be created.
    DirectoryCreateFailed,
    /// A case artifact could not be written.
    CaseWriteFailed,
    /// Fewer ticks than required show a meaningful enemy velocity.
    LowVelocity,
    /// The enemy drone's cumulative displacement is too small.
    LowDisplacement,
    /// No coordinator has results for a case; aggregation stopped there.
    EndOfData,
    /// An expected artifact does not exist.
    MissingArtifact,
    /// An artifact exists but could not be read or has the wrong shape.
    MalformedArtifact,
    /// Two artifact sources use the same output key.
    KeyCollision,
    /// A per-case series does not have one entry per case.
    SeriesMisaligned,
    /// Coordinators ended up with different case counts.
    CaseCountMismatch,
}

impl Reason {
    /// Stable identifier for reports.
    pub const fn code(self) -> &'static str {
        match self {
            Self::DirectoryCreateFailed => "directory_create_failed",
            Self::CaseWriteFailed => "case_write_failed",
            Self::LowVelocity => "low_velocity",
            Self::LowDisplacement => "low_displacement",
            Self::EndOfData => "end_of_data",
            Self::MissingArtifact => "missing_artifact",
            Self::MalformedArtifact => "malformed_artifact",
            Self::KeyCollision => "key_collision",
            Self::SeriesMisaligned => "series_misaligned",
            Self::CaseCountMismatch => "case_count_mismatch",
        }
    }

    /// Severity a diagnostic with this reason carries.
    pub const fn severity(self) -> Severity {
        match self {
            Self::LowVelocity | Self::LowDisplacement | Self::EndOfData => {
                Severity::Informational
            }
            Self::DirectoryCreateFailed
            | Self::CaseWriteFailed
            | Self::SeriesMisaligned
            | Self::CaseCountMismatch => Severity::Recoverable,
            Self::MissingArtifact | Self::MalformedArtifact | Self::KeyCollision => {
                Severity::Fatal
            }
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies the case a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CaseRef {
    pub coordinator: String,
    pub case: String,
}

impl CaseRef {
    pub fn new(coordinator: impl Into<String>, case: impl Into<String>) -> Self {
        Self {
            coordinator: coordinator.into(),
            case: case.into(),
        }
    }
}

impl fmt::Display for CaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.coordinator, self.case)
    }
}

/// A single finding of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic whose severity follows from `reason`.
    pub fn new(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            severity: reason.severity(),
            reason,
            case: None,
            path: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_case(mut self, case: CaseRef) -> Self {
        self.case = Some(case);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.reason)?;
        if let Some(case) = &self.case {
            write!(f, " {case}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path.display())?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics recorded during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a diagnostic and emits it through `tracing`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Fatal => tracing::error!(reason = %diagnostic.reason, "{diagnostic}"),
            Severity::Recoverable => tracing::warn!(reason = %diagnostic.reason, "{diagnostic}"),
            Severity::Informational => {
                tracing::info!(reason = %diagnostic.reason, "{diagnostic}");
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    /// True once any fatal diagnostic has been recorded.
    pub fn is_broken(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_fatal)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }

    pub fn with_reason(&self, reason: Reason) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(move |diagnostic| diagnostic.reason == reason)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
