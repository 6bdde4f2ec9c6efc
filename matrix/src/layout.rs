//! On-disk layout of a test matrix.
//!
//! ```text
//! <root>/<coordinator>/<case-id>/drone.cfg
//!                               /controlled_vars.json
//!                               /enemy_start_pos
//!                               /results/<run-id>/statestore.log
//!                                                /run.log
//!                                                /coordinator_activity.json
//!                                                /data.json
//!                                                /run_data.json
//! ```
//!
//! Everything under `results/` is written by the simulation.

use std::path::{Path, PathBuf};

/// Rendered configuration file read by the simulation.
pub const CONFIG_FILE: &str = "drone.cfg";
/// Snapshot of every controlled variable of the case.
pub const CONTROLLED_VARS_FILE: &str = "controlled_vars.json";
/// Raw `x,y` enemy start offset.
pub const START_POS_FILE: &str = "enemy_start_pos";
/// Key of the start offset inside `controlled_vars.json`.
pub const START_POS_KEY: &str = "enemy_strt_pos";
/// Directory the simulation writes its runs into.
pub const RESULTS_DIR: &str = "results";
/// Run the aggregator reads by default.
pub const DEFAULT_RUN_ID: &str = "1";

/// Per-tick state log.
pub const STATESTORE_LOG: &str = "statestore.log";
/// Free-text run log carrying coordinator timings.
pub const RUN_LOG: &str = "run.log";
/// Per-property coordinator activity.
pub const COORDINATOR_ACTIVITY_FILE: &str = "coordinator_activity.json";
/// Per-property violation metrics.
pub const DATA_FILE: &str = "data.json";
/// Flat per-run counters.
pub const RUN_DATA_FILE: &str = "run_data.json";

/// Every artifact a completed run must provide, relative to the run directory.
pub const RUN_ARTIFACTS: [&str; 5] = [
    STATESTORE_LOG,
    RUN_LOG,
    COORDINATOR_ACTIVITY_FILE,
    DATA_FILE,
    RUN_DATA_FILE,
];

pub fn coordinator_dir(root: &Path, coordinator: &str) -> PathBuf {
    root.join(coordinator)
}

pub fn case_dir(root: &Path, coordinator: &str, case_id: &str) -> PathBuf {
    root.join(coordinator).join(case_id)
}

pub fn results_dir(case_dir: &Path) -> PathBuf {
    case_dir.join(RESULTS_DIR)
}

pub fn run_dir(case_dir: &Path, run_id: &str) -> PathBuf {
    case_dir.join(RESULTS_DIR).join(run_id)
}
