//! Typed per-run metric documents and their cross-case merge.
//!
//! `coordinator_activity.json` and `data.json` are two-level documents
//! (property -> key -> series); `run_data.json` is flat (key -> series).
//! Series are JSON arrays whose elements are kept as-is. Merging adopts new
//! keys and extends existing series, so each series ends up concatenated in
//! case order.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One metric series.
pub type Series = Vec<Value>;

/// Flat `key -> series` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatMetrics(pub IndexMap<String, Series>);

impl FlatMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Merges `other` into `self`, extending series that already exist.
    pub fn merge(&mut self, other: Self) {
        for (key, series) in other.0 {
            match self.0.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().extend(series),
                Entry::Vacant(entry) => {
                    entry.insert(series);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.0.iter().map(|(key, series)| (key.as_str(), series))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Two-level `property -> key -> series` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedMetrics(pub IndexMap<String, FlatMetrics>);

impl NestedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }

    /// Merges `other` into `self` one property at a time.
    pub fn merge(&mut self, other: Self) {
        for (property, metrics) in other.0 {
            self.0.entry(property).or_default().merge(metrics);
        }
    }

    pub fn property(&self, name: &str) -> Option<&FlatMetrics> {
        self.0.get(name)
    }

    pub fn get(&self, property: &str, key: &str) -> Option<&Series> {
        self.0.get(property).and_then(|metrics| metrics.get(key))
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatMetrics)> {
        self.0
            .iter()
            .map(|(property, metrics)| (property.as_str(), metrics))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
