//! Campaign and parameter-space validation errors.

use std::fmt;

/// Result type for parameter-space operations.
pub type SpaceResult<T> = Result<T, SpaceError>;

/// Errors that can occur when building or validating a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpaceError {
    /// The space has no parameters.
    EmptySpace,

    /// A parameter has an empty name or one that cannot be a config key.
    InvalidParameterName { name: String },

    /// The same parameter appears twice.
    DuplicateParameter { name: String },

    /// A parameter expands to no candidate values.
    EmptyValues { name: String },

    /// A range step is zero, negative or not finite.
    InvalidStep { name: String },

    /// A range expands to more candidate values than allowed.
    TooManyValues { name: String, limit: usize },

    /// The Cartesian product does not fit in `usize`.
    SpaceTooLarge,

    /// A combination index is outside the product.
    IndexOutOfRange { index: usize, len: usize },

    /// The campaign names no coordinators.
    NoCoordinators,

    /// A coordinator name is empty or not a single path component.
    InvalidCoordinatorName { name: String },

    /// The same coordinator appears twice.
    DuplicateCoordinator { name: String },

    /// The campaign file could not be parsed.
    InvalidCampaign { reason: String },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "parameter space has no parameters"),
            Self::InvalidParameterName { name } => {
                write!(f, "invalid parameter name {name:?}")
            }
            Self::DuplicateParameter { name } => write!(f, "duplicate parameter {name}"),
            Self::EmptyValues { name } => write!(f, "parameter {name} has no candidate values"),
            Self::InvalidStep { name } => {
                write!(f, "parameter {name} has a non-positive or non-finite step")
            }
            Self::TooManyValues { name, limit } => {
                write!(f, "parameter {name} expands to more than {limit} values")
            }
            Self::SpaceTooLarge => write!(f, "parameter space product overflows usize"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "combination index {index} out of range for {len} combinations")
            }
            Self::NoCoordinators => write!(f, "campaign names no coordinators"),
            Self::InvalidCoordinatorName { name } => {
                write!(f, "invalid coordinator name {name:?}")
            }
            Self::DuplicateCoordinator { name } => write!(f, "duplicate coordinator {name}"),
            Self::InvalidCampaign { reason } => write!(f, "invalid campaign file: {reason}"),
        }
    }
}

impl std::error::Error for SpaceError {}
