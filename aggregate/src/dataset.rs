//! Per-coordinator merged dataset.

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::artifacts::CaseArtifacts;
use crate::metrics::{FlatMetrics, NestedMetrics};
use crate::overhead::{
    OverheadSeries, ABSOLUTE_OVERHEAD_KEY, RELATIVE_OVERHEAD_KEY, TIME_TAKEN_KEY,
};

/// Output key of the per-case controlled variables.
pub const CONTROLLED_VARS_KEY: &str = "controlled_vars";

/// Everything aggregated for one coordinator.
///
/// Serializes as a single flat JSON object: the overhead series, then
/// `controlled_vars`, then each property of the two-level documents, then
/// each key of the run data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedDataset {
    /// Pooled per-tick overhead of every case.
    pub overhead: OverheadSeries,
    /// One entry per merged case, in case order.
    pub controlled_vars: Vec<Value>,
    /// Merged `coordinator_activity.json` and `data.json`.
    pub properties: NestedMetrics,
    /// Merged `run_data.json`.
    pub run_data: FlatMetrics,
}

/// A per-case series whose length differs from the case count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misalignment {
    /// `property.key` for two-level series, `key` for run data.
    pub series: String,
    pub len: usize,
    pub expected: usize,
}

impl AggregatedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one case into the dataset.
    pub fn add_case(&mut self, case: CaseArtifacts) {
        self.overhead.append(case.overhead);
        self.controlled_vars.push(case.controlled_vars);
        self.properties.merge(case.coordinator_activity);
        self.properties.merge(case.data);
        self.run_data.merge(case.run_data);
    }

    /// Number of merged cases.
    pub fn case_count(&self) -> usize {
        self.controlled_vars.len()
    }

    /// Output names claimed by more than one source, in first-seen order.
    pub fn key_collisions(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut collisions = Vec::new();
        let names = OverheadSeries::keys()
            .into_iter()
            .chain([CONTROLLED_VARS_KEY])
            .chain(self.properties.properties())
            .chain(self.run_data.keys());
        for name in names {
            if !seen.insert(name) && !collisions.iter().any(|known: &String| known == name) {
                collisions.push(name.to_string());
            }
        }
        collisions
    }

    /// Per-case series that do not have one entry per merged case.
    pub fn misaligned_series(&self) -> Vec<Misalignment> {
        let expected = self.case_count();
        let nested = self.properties.iter().flat_map(|(property, metrics)| {
            metrics
                .iter()
                .map(move |(key, series)| (format!("{property}.{key}"), series.len()))
        });
        let flat = self
            .run_data
            .iter()
            .map(|(key, series)| (key.to_string(), series.len()));
        nested
            .chain(flat)
            .filter(|(_, len)| *len != expected)
            .map(|(series, len)| Misalignment {
                series,
                len,
                expected,
            })
            .collect()
    }
}

impl Serialize for AggregatedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 4 + self.properties.len() + self.run_data.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(TIME_TAKEN_KEY, &self.overhead.time_taken_per_tick)?;
        map.serialize_entry(ABSOLUTE_OVERHEAD_KEY, &self.overhead.absolute_overhead_per_tick)?;
        map.serialize_entry(RELATIVE_OVERHEAD_KEY, &self.overhead.relative_overhead_per_tick)?;
        map.serialize_entry(CONTROLLED_VARS_KEY, &self.controlled_vars)?;
        for (property, metrics) in self.properties.iter() {
            map.serialize_entry(property, metrics)?;
        }
        for (key, series) in self.run_data.iter() {
            map.serialize_entry(key, series)?;
        }
        map.end()
    }
}
