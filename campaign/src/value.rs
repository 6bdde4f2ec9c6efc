//! Parameter values and the value sets they are drawn from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SpaceError, SpaceResult};

/// Decimal places kept when a float range is expanded.
///
/// Accumulating `start + i * step` in binary floating point drifts in the
/// last bits; rounding here keeps `controlled_vars.json` readable.
const RANGE_DECIMALS: f64 = 1e10;

/// Tolerance applied to the exclusive stop of a float range.
const RANGE_EPSILON: f64 = 1e-9;

/// Upper bound on the candidate values a single range may expand to.
pub const MAX_VALUES_PER_PARAMETER: usize = 1 << 20;

/// A single candidate value of a configuration parameter.
///
/// Integers serialize as plain JSON integers and floats as JSON numbers, so a
/// combination written to `controlled_vars.json` keeps the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Returns the value as a float regardless of its kind.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    /// Returns true for the float kind.
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }
}

/// Floats render with two decimals, integers in their default form.
///
/// This is the form used both in case directory names and in rendered
/// configuration files.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:.2}"),
        }
    }
}

impl From<ParamValue> for serde_json::Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Int(value) => Self::from(value),
            ParamValue::Float(value) => Self::from(value),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Declarative description of a parameter's candidate values.
///
/// Ranges are half-open (`stop` is excluded), matching how the campaign has
/// always been described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ValueSet {
    IntRange { start: i64, stop: i64, step: i64 },
    FloatRange { start: f64, stop: f64, step: f64 },
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl ValueSet {
    /// Expands the set into its ordered candidate values.
    pub fn expand(&self, name: &str) -> SpaceResult<Vec<ParamValue>> {
        let values: Vec<ParamValue> = match self {
            Self::IntRange { start, stop, step } => {
                if *step <= 0 {
                    return Err(SpaceError::InvalidStep {
                        name: name.to_string(),
                    });
                }
                let span = (i128::from(*stop) - i128::from(*start)).max(0);
                let count = (span + i128::from(*step) - 1) / i128::from(*step);
                check_count(name, usize::try_from(count).ok())?;
                let step = usize::try_from(*step).map_err(|_| SpaceError::InvalidStep {
                    name: name.to_string(),
                })?;
                (*start..*stop).step_by(step).map(ParamValue::Int).collect()
            }
            Self::FloatRange { start, stop, step } => {
                if !(step.is_finite() && *step > 0.0 && start.is_finite() && stop.is_finite()) {
                    return Err(SpaceError::InvalidStep {
                        name: name.to_string(),
                    });
                }
                let count = ((stop - start) / step - RANGE_EPSILON).ceil().max(0.0);
                let count = check_count(
                    name,
                    (count <= MAX_VALUES_PER_PARAMETER as f64).then_some(count as usize),
                )?;
                (0..count)
                    .map(|idx| {
                        let value = start + step * idx as f64;
                        ParamValue::Float((value * RANGE_DECIMALS).round() / RANGE_DECIMALS)
                    })
                    .collect()
            }
            Self::Ints(values) => values.iter().copied().map(ParamValue::Int).collect(),
            Self::Floats(values) => values.iter().copied().map(ParamValue::Float).collect(),
        };
        if values.is_empty() {
            return Err(SpaceError::EmptyValues {
                name: name.to_string(),
            });
        }
        Ok(values)
    }
}

fn check_count(name: &str, count: Option<usize>) -> SpaceResult<usize> {
    count
        .filter(|count| *count <= MAX_VALUES_PER_PARAMETER)
        .ok_or_else(|| SpaceError::TooManyValues {
            name: name.to_string(),
            limit: MAX_VALUES_PER_PARAMETER,
        })
}
