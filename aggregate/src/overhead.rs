//! Coordinator scheduling overhead from `run.log`.

use serde::Serialize;

use crate::error::ParseError;
use crate::options::AggregateOptions;

/// Output key of the per-tick coordinator time.
pub const TIME_TAKEN_KEY: &str = "time_taken_per_tick";
/// Output key of the per-tick time over budget, in milliseconds.
pub const ABSOLUTE_OVERHEAD_KEY: &str = "absolute_overhead_per_tick";
/// Output key of the per-tick time over budget, as a fraction of the budget.
pub const RELATIVE_OVERHEAD_KEY: &str = "relative_overhead_per_tick";

/// Per-tick overhead series.
///
/// The three series always have the same length. Series from several runs
/// are pooled by appending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverheadSeries {
    pub time_taken_per_tick: Vec<u64>,
    pub absolute_overhead_per_tick: Vec<f64>,
    pub relative_overhead_per_tick: Vec<f64>,
}

impl OverheadSeries {
    pub const fn new() -> Self {
        Self {
            time_taken_per_tick: Vec::new(),
            absolute_overhead_per_tick: Vec::new(),
            relative_overhead_per_tick: Vec::new(),
        }
    }

    /// Records one tick that took `millis` against a `budget_ms` budget.
    pub fn record(&mut self, millis: u64, budget_ms: u64) {
        let over = millis.saturating_sub(budget_ms) as f64;
        let relative = if budget_ms == 0 {
            0.0
        } else {
            over / budget_ms as f64
        };
        self.time_taken_per_tick.push(millis);
        self.absolute_overhead_per_tick.push(over);
        self.relative_overhead_per_tick.push(relative);
    }

    /// Appends the ticks of another run.
    pub fn append(&mut self, other: Self) {
        self.time_taken_per_tick.extend(other.time_taken_per_tick);
        self.absolute_overhead_per_tick
            .extend(other.absolute_overhead_per_tick);
        self.relative_overhead_per_tick
            .extend(other.relative_overhead_per_tick);
    }

    pub fn len(&self) -> usize {
        self.time_taken_per_tick.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_taken_per_tick.is_empty()
    }

    /// Output keys in serialization order.
    pub const fn keys() -> [&'static str; 3] {
        [TIME_TAKEN_KEY, ABSOLUTE_OVERHEAD_KEY, RELATIVE_OVERHEAD_KEY]
    }
}

/// Extracts coordinator timings from a run log.
///
/// Lines containing the overhead marker carry an integer millisecond count at
/// the configured token of the line split on single spaces. Other lines are
/// ignored.
pub fn get_overhead_info(
    text: &str,
    options: &AggregateOptions,
) -> Result<OverheadSeries, ParseError> {
    let mut series = OverheadSeries::new();
    for (idx, line) in text.lines().enumerate() {
        if !line.contains(&options.overhead_marker) {
            continue;
        }
        let token = line
            .split(' ')
            .nth(options.overhead_token_index)
            .ok_or_else(|| {
                ParseError::new(
                    idx + 1,
                    format!("no token at index {}", options.overhead_token_index),
                )
            })?;
        let millis = token
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::new(idx + 1, format!("invalid millisecond count {token:?}")))?;
        series.record(millis, options.tick_budget_ms);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> OverheadSeries {
        get_overhead_info(text, &AggregateOptions::default()).unwrap()
    }

    #[test]
    fn over_and_under_budget() {
        let series = parse("Coordinator took 90 ms\nCoordinator took 30 ms\n");
        assert_eq!(series.time_taken_per_tick, vec![90, 30]);
        assert_eq!(series.absolute_overhead_per_tick, vec![30.0, 0.0]);
        assert_eq!(series.relative_overhead_per_tick, vec![0.5, 0.0]);
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let series = parse("starting mission\nCoordinator took 60 ms\ntick 3 done\n");
        assert_eq!(series.time_taken_per_tick, vec![60]);
        assert_eq!(series.absolute_overhead_per_tick, vec![0.0]);
    }

    #[test]
    fn empty_log_yields_empty_series() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn non_integer_token_is_an_error() {
        let err = get_overhead_info(
            "ok\nCoordinator took many ms\n",
            &AggregateOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err =
            get_overhead_info("Coordinator took\n", &AggregateOptions::default()).unwrap_err();
        assert!(err.reason.contains("index 2"));
    }

    #[test]
    fn append_pools_runs() {
        let mut pooled = parse("Coordinator took 120 ms\n");
        pooled.append(parse("Coordinator took 10 ms\n"));
        assert_eq!(pooled.time_taken_per_tick, vec![120, 10]);
        assert_eq!(pooled.relative_overhead_per_tick, vec![1.0, 0.0]);
        assert_eq!(pooled.len(), 2);
    }

    #[test]
    fn serializes_with_output_keys() {
        let json = serde_json::to_value(parse("Coordinator took 66 ms\n")).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, OverheadSeries::keys().to_vec());
    }
}
