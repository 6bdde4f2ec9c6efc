//! Campaign descriptions: which coordinators are evaluated over which space.

use serde::{Deserialize, Serialize};

use crate::error::{SpaceError, SpaceResult};
use crate::space::{is_valid_key, ConfigParameterSpace, Parameter};
use crate::value::ValueSet;

/// Coordinators evaluated by the drone campaign.
pub const DRONE_COORDINATORS: [&str; 3] = [
    "PriorityCoordinator",
    "RobustnessCoordinator",
    "SynthRobustnessCoordinator",
];

/// One parameter of a campaign file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub name: String,
    pub values: ValueSet,
}

/// A campaign: coordinator variants plus the parameter space they share.
///
/// ```json
/// {
///   "coordinators": ["PriorityCoordinator"],
///   "parameters": [
///     { "name": "BOUNDARY_SIZE", "values": { "int_range": { "start": 10, "stop": 30, "step": 1 } } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Campaign {
    pub coordinators: Vec<String>,
    pub parameters: Vec<ParameterSpec>,
}

impl Campaign {
    /// The built-in drone evaluation campaign.
    pub fn drone() -> Self {
        Self {
            coordinators: DRONE_COORDINATORS.iter().map(ToString::to_string).collect(),
            parameters: vec![
                ParameterSpec {
                    name: "ENEMY_DRONE_SPEED".to_string(),
                    values: ValueSet::FloatRange {
                        start: 1.2,
                        stop: 2.1,
                        step: 0.1,
                    },
                },
                ParameterSpec {
                    name: "WAYPOINT_SEED".to_string(),
                    values: ValueSet::IntRange {
                        start: 0,
                        stop: 999,
                        step: 1,
                    },
                },
                ParameterSpec {
                    name: "BOUNDARY_SIZE".to_string(),
                    values: ValueSet::IntRange {
                        start: 10,
                        stop: 30,
                        step: 1,
                    },
                },
            ],
        }
    }

    /// Parses and validates a campaign from JSON.
    pub fn from_json(contents: &str) -> SpaceResult<Self> {
        let campaign: Self =
            serde_json::from_str(contents).map_err(|err| SpaceError::InvalidCampaign {
                reason: err.to_string(),
            })?;
        campaign.validate()?;
        Ok(campaign)
    }

    /// Checks the coordinator list and that the space expands cleanly.
    pub fn validate(&self) -> SpaceResult<()> {
        if self.coordinators.is_empty() {
            return Err(SpaceError::NoCoordinators);
        }
        for (idx, name) in self.coordinators.iter().enumerate() {
            if !is_valid_key(name) || name == "." || name == ".." {
                return Err(SpaceError::InvalidCoordinatorName { name: name.clone() });
            }
            if self.coordinators[..idx].contains(name) {
                return Err(SpaceError::DuplicateCoordinator { name: name.clone() });
            }
        }
        self.space().map(|_| ())
    }

    /// Expands the parameter specs into a [`ConfigParameterSpace`].
    pub fn space(&self) -> SpaceResult<ConfigParameterSpace> {
        let parameters = self
            .parameters
            .iter()
            .map(|spec| {
                spec.values
                    .expand(&spec.name)
                    .map(|values| Parameter::new(spec.name.clone(), values))
            })
            .collect::<SpaceResult<Vec<_>>>()?;
        ConfigParameterSpace::new(parameters)
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::drone()
    }
}
