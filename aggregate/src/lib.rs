//! Result aggregation for coordinator evaluation campaigns.
//!
//! This crate reads what the simulation left in a test matrix and merges it:
//! - Enemy drone liveness heuristics over `statestore.log`
//! - Coordinator scheduling overhead from `run.log`
//! - Typed two-level and flat metric documents with append-merge
//! - Per-coordinator datasets, consistency checks and JSON output
//! - A read-only progress survey
//!
//! # Design Principles
//!
//! - **Report everything** - A scan never stops at the first bad case;
//!   every missing or malformed artifact is recorded in one pass.
//! - **All or nothing** - A scan with fatal diagnostics writes no output.
//! - **Aligned series** - Cases are merged in sorted order so index `i` of
//!   every series refers to the same case.

mod artifacts;
mod dataset;
mod error;
mod liveness;
mod metrics;
mod options;
mod overhead;
mod scan;
mod status;

pub use artifacts::{expected_files, load_case, CaseArtifacts};
pub use dataset::{AggregatedDataset, Misalignment, CONTROLLED_VARS_KEY};
pub use error::{AggregateError, AggregateResult, ParseError};
pub use liveness::{
    check_enemy_drone_alive, parse_statestore, Liveness, LivenessReport, StateSample,
};
pub use metrics::{FlatMetrics, NestedMetrics, Series};
pub use options::AggregateOptions;
pub use overhead::{
    get_overhead_info, OverheadSeries, ABSOLUTE_OVERHEAD_KEY, RELATIVE_OVERHEAD_KEY,
    TIME_TAKEN_KEY,
};
pub use scan::{AggregateReport, Aggregator};
pub use status::{survey, CoordinatorStatus};
