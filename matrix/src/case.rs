//! Sampling test cases from a parameter space.

use campaign::{position_for, Combination, ConfigParameterSpace, StartOffset, WeightProfile};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde_json::{Map, Value};

use crate::error::{GenerateError, GenerateResult};
use crate::layout::START_POS_KEY;

/// One sampled point of the test matrix.
///
/// `combination` holds the sampled parameters followed by the weight keys;
/// its identifier names the case directory. Cases are immutable once planned.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Position in case order (sorted by identifier).
    pub index: usize,
    pub combination: Combination,
    pub weights: WeightProfile,
    pub position: StartOffset,
}

impl TestCase {
    /// Directory name of the case.
    pub fn id(&self) -> String {
        self.combination.identifier()
    }

    /// Every controlled variable: parameters, weights and the start offset.
    pub fn controlled_vars(&self) -> Value {
        let mut vars = Map::new();
        for (key, value) in self.combination.iter() {
            vars.insert(key.to_string(), Value::from(value));
        }
        vars.insert(
            START_POS_KEY.to_string(),
            Value::String(self.position.to_string()),
        );
        Value::Object(vars)
    }
}

/// Draws `count` distinct combinations uniformly without replacement.
///
/// The result is unordered.
pub fn sample_combinations<R: Rng + ?Sized>(
    space: &ConfigParameterSpace,
    count: usize,
    rng: &mut R,
) -> GenerateResult<Vec<Combination>> {
    if count > space.len() {
        return Err(GenerateError::InsufficientCombinations {
            requested: count,
            available: space.len(),
        });
    }
    index::sample(rng, space.len(), count)
        .into_iter()
        .map(|idx| space.combination_at(idx).map_err(GenerateError::from))
        .collect()
}

/// Plans the cases of a test matrix.
///
/// Samples `count` combinations, attaches a weight profile drawn uniformly
/// from `catalog` to each, sorts the cases by identifier and assigns start
/// offsets cyclically in that order. Every coordinator materializes the same
/// plan, so case `i` of one coordinator matches case `i` of every other in
/// parameters, weights and start offset.
pub fn plan_cases<R: Rng + ?Sized>(
    space: &ConfigParameterSpace,
    count: usize,
    catalog: &[WeightProfile],
    rng: &mut R,
) -> GenerateResult<Vec<TestCase>> {
    if catalog.is_empty() {
        return Err(GenerateError::EmptyWeightCatalog);
    }
    let sampled = sample_combinations(space, count, rng)?;

    let mut weighted = sampled
        .into_iter()
        .map(|mut combination| {
            let weights = *catalog.choose(rng).ok_or(GenerateError::EmptyWeightCatalog)?;
            weights.apply(&mut combination);
            Ok((combination, weights))
        })
        .collect::<GenerateResult<Vec<(Combination, WeightProfile)>>>()?;
    weighted.sort_by_cached_key(|(combination, _)| combination.identifier());

    if let Some(pair) = weighted
        .windows(2)
        .find(|pair| pair[0].0.identifier() == pair[1].0.identifier())
    {
        return Err(GenerateError::DuplicateCaseId {
            id: pair[0].0.identifier(),
        });
    }

    Ok(weighted
        .into_iter()
        .enumerate()
        .map(|(index, (combination, weights))| TestCase {
            index,
            combination,
            weights,
            position: position_for(index),
        })
        .collect())
}
