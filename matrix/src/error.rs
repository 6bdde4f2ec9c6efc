//! Error types for test matrix generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

use campaign::SpaceError;

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Fatal generation errors.
///
/// Everything here aborts a run before any case directory is written.
/// Per-case I/O problems are reported as diagnostics instead.
#[derive(Debug)]
#[non_exhaustive]
pub enum GenerateError {
    /// The parameter space or campaign is invalid.
    Space(SpaceError),

    /// More cases were requested than the space has combinations.
    InsufficientCombinations { requested: usize, available: usize },

    /// No weight profiles to draw from.
    EmptyWeightCatalog,

    /// Two sampled cases would share a directory.
    DuplicateCaseId { id: String },

    /// A varied key has no line in the configuration template.
    TemplateMissingKey { key: String },

    /// Reading the template or creating the output root failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(err) => write!(f, "parameter space error: {err}"),
            Self::InsufficientCombinations {
                requested,
                available,
            } => {
                write!(
                    f,
                    "requested {requested} cases but the space has only {available} combinations"
                )
            }
            Self::EmptyWeightCatalog => write!(f, "weight profile catalog is empty"),
            Self::DuplicateCaseId { id } => write!(f, "two cases share the identifier {id}"),
            Self::TemplateMissingKey { key } => {
                write!(f, "configuration template has no line for {key}")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Space(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SpaceError> for GenerateError {
    fn from(err: SpaceError) -> Self {
        Self::Space(err)
    }
}
