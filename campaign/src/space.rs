//! Configuration parameter spaces and their Cartesian product.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{SpaceError, SpaceResult};
use crate::value::ParamValue;

/// A named parameter and its ordered candidate values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub values: Vec<ParamValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Ordered mapping from parameter name to candidate values.
///
/// The space is immutable once built. Combinations are enumerated in
/// lexicographic order with the last parameter varying fastest, and can be
/// addressed directly by index without materializing the whole product.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigParameterSpace {
    parameters: Vec<Parameter>,
    len: usize,
}

impl ConfigParameterSpace {
    /// Creates a validated space.
    ///
    /// # Errors
    ///
    /// Returns an error if the space is empty, a name is invalid or repeated,
    /// a parameter has no values, or the product overflows `usize`.
    pub fn new(parameters: Vec<Parameter>) -> SpaceResult<Self> {
        if parameters.is_empty() {
            return Err(SpaceError::EmptySpace);
        }
        let mut len = 1usize;
        for (idx, param) in parameters.iter().enumerate() {
            if !is_valid_key(&param.name) {
                return Err(SpaceError::InvalidParameterName {
                    name: param.name.clone(),
                });
            }
            if parameters[..idx].iter().any(|p| p.name == param.name) {
                return Err(SpaceError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
            if param.values.is_empty() {
                return Err(SpaceError::EmptyValues {
                    name: param.name.clone(),
                });
            }
            len = len
                .checked_mul(param.values.len())
                .ok_or(SpaceError::SpaceTooLarge)?;
        }
        Ok(Self { parameters, len })
    }

    /// Returns the parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the number of combinations in the Cartesian product.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// A validated space is never empty; provided for API completeness.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the combination at `index` in enumeration order.
    pub fn combination_at(&self, index: usize) -> SpaceResult<Combination> {
        if index >= self.len {
            return Err(SpaceError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let mut picks = vec![0usize; self.parameters.len()];
        let mut rest = index;
        for (slot, param) in picks.iter_mut().zip(&self.parameters).rev() {
            let radix = param.values.len();
            *slot = rest % radix;
            rest /= radix;
        }
        let entries = self
            .parameters
            .iter()
            .zip(picks)
            .map(|(param, pick)| (param.name.clone(), param.values[pick]))
            .collect();
        Ok(Combination { entries })
    }

    /// Iterates the full Cartesian product.
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            space: self,
            next: 0,
        }
    }
}

/// Iterator over every combination of a [`ConfigParameterSpace`].
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    space: &'a ConfigParameterSpace,
    next: usize,
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        let combination = self.space.combination_at(self.next).ok()?;
        self.next += 1;
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.space.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Combinations<'_> {}

/// An ordered set of `name -> value` assignments.
///
/// Serializes as a flat JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combination {
    entries: Vec<(String, ParamValue)>,
}

impl Combination {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `name`, replacing an existing value in place or appending.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the case identifier: `name` immediately followed by the
    /// formatted value, for every entry, joined with `-`.
    pub fn identifier(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}{value}"))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A key must be a single whitespace-free token that is also safe inside a
/// directory name.
pub(crate) fn is_valid_key(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '/' || ch == '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_space() -> ConfigParameterSpace {
        ConfigParameterSpace::new(vec![
            Parameter::new("A", vec![ParamValue::Int(0), ParamValue::Int(1)]),
            Parameter::new(
                "B",
                vec![
                    ParamValue::Float(0.5),
                    ParamValue::Float(1.0),
                    ParamValue::Float(1.5),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn product_len_multiplies_value_counts() {
        assert_eq!(small_space().len(), 6);
    }

    #[test]
    fn last_parameter_varies_fastest() {
        let space = small_space();
        let first = space.combination_at(0).unwrap();
        let second = space.combination_at(1).unwrap();
        let fourth = space.combination_at(3).unwrap();
        assert_eq!(first.get("A"), Some(ParamValue::Int(0)));
        assert_eq!(first.get("B"), Some(ParamValue::Float(0.5)));
        assert_eq!(second.get("B"), Some(ParamValue::Float(1.0)));
        assert_eq!(fourth.get("A"), Some(ParamValue::Int(1)));
        assert_eq!(fourth.get("B"), Some(ParamValue::Float(0.5)));
    }

    #[test]
    fn iterator_covers_every_combination_once() {
        let space = small_space();
        let ids: Vec<String> = space.combinations().map(|c| c.identifier()).collect();
        assert_eq!(ids.len(), 6);
        let mut dedup = ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 6);
        assert_eq!(space.combinations().len(), 6);
    }

    #[test]
    fn index_past_end_is_rejected() {
        assert_eq!(
            small_space().combination_at(6),
            Err(SpaceError::IndexOutOfRange { index: 6, len: 6 })
        );
    }

    #[test]
    fn rejects_duplicate_and_invalid_names() {
        let dup = ConfigParameterSpace::new(vec![
            Parameter::new("A", vec![ParamValue::Int(0)]),
            Parameter::new("A", vec![ParamValue::Int(1)]),
        ]);
        assert_eq!(
            dup,
            Err(SpaceError::DuplicateParameter {
                name: "A".to_string()
            })
        );
        let spaced = ConfigParameterSpace::new(vec![Parameter::new(
            "TWO WORDS",
            vec![ParamValue::Int(0)],
        )]);
        assert!(matches!(
            spaced,
            Err(SpaceError::InvalidParameterName { .. })
        ));
        assert_eq!(
            ConfigParameterSpace::new(Vec::new()),
            Err(SpaceError::EmptySpace)
        );
    }

    #[test]
    fn product_overflow_is_rejected() {
        let wide: Vec<ParamValue> = (0..1 << 16).map(ParamValue::Int).collect();
        let params = (0..5)
            .map(|idx| Parameter::new(format!("P{idx}"), wide.clone()))
            .collect();
        assert_eq!(
            ConfigParameterSpace::new(params),
            Err(SpaceError::SpaceTooLarge)
        );
    }

    #[test]
    fn identifier_joins_name_and_formatted_value() {
        let mut combination = Combination::new();
        combination.set("ENEMY_DRONE_SPEED", ParamValue::Float(1.3));
        combination.set("WAYPOINT_SEED", ParamValue::Int(42));
        assert_eq!(
            combination.identifier(),
            "ENEMY_DRONE_SPEED1.30-WAYPOINT_SEED42"
        );
    }

    #[test]
    fn set_replaces_in_place() {
        let mut combination = Combination::new();
        combination.set("A", ParamValue::Int(1));
        combination.set("B", ParamValue::Int(2));
        combination.set("A", ParamValue::Int(3));
        let keys: Vec<&str> = combination.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(combination.get("A"), Some(ParamValue::Int(3)));
    }

    #[test]
    fn combination_serializes_as_ordered_object() {
        let mut combination = Combination::new();
        combination.set("Z", ParamValue::Int(1));
        combination.set("A", ParamValue::Float(0.25));
        let json = serde_json::to_string(&combination).unwrap();
        assert_eq!(json, r#"{"Z":1,"A":0.25}"#);
    }
}
