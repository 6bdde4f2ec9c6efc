//! Aggregation tunables.

use matrix::layout::DEFAULT_RUN_ID;

/// Thresholds and log conventions applied while aggregating.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    /// Run directory under `results/` to read.
    pub run_id: String,
    /// Wall-clock budget of one simulation tick, in milliseconds.
    pub tick_budget_ms: u64,
    /// Velocity L1 norm at or above which a tick counts as moving.
    pub velocity_threshold: f64,
    /// Minimum number of moving ticks for a live enemy drone.
    pub min_moving_ticks: usize,
    /// Minimum cumulative L1 displacement for a live enemy drone.
    pub min_displacement: f64,
    /// Substring marking a coordinator timing line in `run.log`.
    pub overhead_marker: String,
    /// Index of the millisecond token in a timing line split on spaces.
    pub overhead_token_index: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            run_id: DEFAULT_RUN_ID.to_string(),
            tick_budget_ms: 60,
            velocity_threshold: 0.1,
            min_moving_ticks: 5,
            min_displacement: 5.0,
            overhead_marker: "Coordinator took".to_string(),
            overhead_token_index: 2,
        }
    }
}

impl AggregateOptions {
    /// Creates options with lenient liveness thresholds for small fixtures.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            min_moving_ticks: 2,
            min_displacement: 1.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_simulation_conventions() {
        let options = AggregateOptions::default();
        assert_eq!(options.run_id, "1");
        assert_eq!(options.tick_budget_ms, 60);
        assert_eq!(options.overhead_token_index, 2);
    }

    #[test]
    fn testing_options_are_more_lenient() {
        let test_options = AggregateOptions::for_testing();
        let default_options = AggregateOptions::default();
        assert!(test_options.min_moving_ticks < default_options.min_moving_ticks);
        assert!(test_options.min_displacement < default_options.min_displacement);
    }
}
