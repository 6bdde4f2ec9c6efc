use std::fs;
use std::path::{Path, PathBuf};

use aggregate::{AggregateError, AggregateOptions, Aggregator};
use campaign::{Reason, Severity};
use matrix::layout;
use serde_json::json;

const COORDINATORS: [&str; 2] = ["Priority", "Robustness"];

fn moving_statestore() -> String {
    let mut text = String::from("tick,enemy\n");
    for tick in 0..10 {
        let x = f64::from(tick);
        text.push_str(&format!("{tick},0,0,0,0,0,{x},{x},1,1,1,0\n"));
    }
    text
}

fn still_statestore() -> String {
    let mut text = String::new();
    for tick in 0..10 {
        text.push_str(&format!("{tick},0,0,0,0,0,3,3,3,1,0,0\n"));
    }
    text
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn case_dir(&self, coordinator: &str, case: &str) -> PathBuf {
        layout::case_dir(self.root(), coordinator, case)
    }

    /// A generated case with no results yet.
    fn pending(&self, coordinator: &str, case: &str, seed: i64) {
        let dir = self.case_dir(coordinator, case);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(layout::CONTROLLED_VARS_FILE),
            json!({ "WAYPOINT_SEED": seed, "enemy_strt_pos": "5,5" }).to_string(),
        )
        .unwrap();
    }

    /// A generated case with a complete run.
    fn completed(&self, coordinator: &str, case: &str, seed: i64, statestore: &str) {
        self.pending(coordinator, case, seed);
        let run_dir = layout::run_dir(&self.case_dir(coordinator, case), "1");
        fs::create_dir_all(&run_dir).unwrap();
        fs::write(run_dir.join(layout::STATESTORE_LOG), statestore).unwrap();
        fs::write(
            run_dir.join(layout::RUN_LOG),
            format!(
                "mission start\nCoordinator took {} ms\nCoordinator took 30 ms\n",
                60 + seed
            ),
        )
        .unwrap();
        fs::write(
            run_dir.join(layout::COORDINATOR_ACTIVITY_FILE),
            json!({ "BoundaryEnforcer": { "active_ticks": [seed] } }).to_string(),
        )
        .unwrap();
        fs::write(
            run_dir.join(layout::DATA_FILE),
            json!({ "NoCollision": { "violations": [seed * 10] } }).to_string(),
        )
        .unwrap();
        fs::write(
            run_dir.join(layout::RUN_DATA_FILE),
            json!({ "ticks": [100 + seed] }).to_string(),
        )
        .unwrap();
    }

    fn aggregate(&self) -> aggregate::AggregateReport {
        Aggregator::new(AggregateOptions::default())
            .aggregate(self.root())
            .unwrap()
    }
}

#[test]
fn merges_completed_cases_in_sorted_order() {
    let fixture = Fixture::new();
    for coordinator in COORDINATORS {
        // Created out of order on purpose.
        fixture.completed(coordinator, "SEED2", 2, &moving_statestore());
        fixture.completed(coordinator, "SEED1", 1, &moving_statestore());
    }

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    assert_eq!(report.uniform_case_count(), Some(2));
    assert!(report.diagnostics.is_empty());

    let out = fixture.root().join("merged.json");
    report.write_json(&out).unwrap();
    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    let priority = &merged["Priority"];
    assert_eq!(priority["time_taken_per_tick"], json!([61, 30, 62, 30]));
    assert_eq!(priority["absolute_overhead_per_tick"], json!([1.0, 0.0, 2.0, 0.0]));
    assert_eq!(priority["controlled_vars"][0]["WAYPOINT_SEED"], 1);
    assert_eq!(priority["controlled_vars"][1]["WAYPOINT_SEED"], 2);
    assert_eq!(priority["BoundaryEnforcer"]["active_ticks"], json!([1, 2]));
    assert_eq!(priority["NoCollision"]["violations"], json!([10, 20]));
    assert_eq!(priority["ticks"], json!([101, 102]));

    let coordinators: Vec<&String> = merged.as_object().unwrap().keys().collect();
    assert_eq!(coordinators, vec!["Priority", "Robustness"]);
}

#[test]
fn stops_at_first_case_without_any_results() {
    let fixture = Fixture::new();
    for coordinator in COORDINATORS {
        fixture.completed(coordinator, "SEED1", 1, &moving_statestore());
        fixture.pending(coordinator, "SEED2", 2);
        fixture.completed(coordinator, "SEED3", 3, &moving_statestore());
    }

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    assert_eq!(report.uniform_case_count(), Some(1));
    let stops: Vec<_> = report.diagnostics.with_reason(Reason::EndOfData).collect();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].case.as_ref().unwrap().case, "SEED2");
}

#[test]
fn case_with_results_elsewhere_is_fatal_when_missing_here() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &moving_statestore());
    fixture.pending("Robustness", "SEED1", 1);

    let report = fixture.aggregate();
    assert!(report.is_broken());
    let missing: Vec<_> = report
        .diagnostics
        .with_reason(Reason::MissingArtifact)
        .collect();
    assert_eq!(missing.len(), 5);
    assert!(missing
        .iter()
        .all(|diagnostic| diagnostic.case.as_ref().unwrap().coordinator == "Robustness"));
}

#[test]
fn missing_data_file_breaks_run_and_reports_every_gap() {
    let fixture = Fixture::new();
    for coordinator in COORDINATORS {
        for seed in 1..=3 {
            let case = format!("SEED{seed}");
            fixture.completed(coordinator, &case, seed, &moving_statestore());
        }
    }
    let data_file =
        layout::run_dir(&fixture.case_dir("Priority", "SEED2"), "1").join(layout::DATA_FILE);
    fs::remove_file(&data_file).unwrap();
    let run_log =
        layout::run_dir(&fixture.case_dir("Robustness", "SEED3"), "1").join(layout::RUN_LOG);
    fs::remove_file(&run_log).unwrap();

    let report = fixture.aggregate();
    assert!(report.is_broken());
    let missing: Vec<_> = report
        .diagnostics
        .with_reason(Reason::MissingArtifact)
        .map(|diagnostic| diagnostic.path.clone().unwrap())
        .collect();
    assert_eq!(missing, vec![data_file, run_log]);
    assert!(report
        .diagnostics
        .with_reason(Reason::CaseCountMismatch)
        .next()
        .is_none());

    let out = fixture.root().join("merged.json");
    let err = report.write_json(&out).unwrap_err();
    assert!(matches!(err, AggregateError::Broken { fatal: 2 }));
    assert!(!out.exists());
}

#[test]
fn unequal_case_counts_warn_but_still_write() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &moving_statestore());
    fixture.completed("Priority", "SEED2", 2, &moving_statestore());
    fixture.completed("Robustness", "SEED1", 1, &moving_statestore());

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    assert_eq!(report.uniform_case_count(), None);
    let warnings: Vec<_> = report
        .diagnostics
        .with_reason(Reason::CaseCountMismatch)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Recoverable);
    assert!(warnings[0].message.contains("Priority: 2"));
    assert!(warnings[0].message.contains("Robustness: 1"));

    let out = fixture.root().join("merged.json");
    report.write_json(&out).unwrap();
    assert!(out.exists());
}

#[test]
fn still_drone_is_flagged_but_merged() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &still_statestore());

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    assert_eq!(report.uniform_case_count(), Some(1));
    let low: Vec<_> = report
        .diagnostics
        .with_reason(Reason::LowDisplacement)
        .collect();
    assert_eq!(low.len(), 1);
    assert!(low[0].message.contains("didn't move enough"));
    assert_eq!(low[0].severity, Severity::Informational);
    assert_eq!(report.diagnostics.with_reason(Reason::LowVelocity).count(), 0);
}

#[test]
fn parked_drone_is_flagged_for_low_velocity() {
    let parked: String = (0..10)
        .map(|tick| format!("{tick},0,0,0,0,0,3,3,3,0,0,0\n"))
        .collect();
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &parked);

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    let slow: Vec<_> = report
        .diagnostics
        .with_reason(Reason::LowVelocity)
        .collect();
    assert_eq!(slow.len(), 1);
    assert!(slow[0].message.contains("velocities too low"));
    assert_eq!(
        report.diagnostics.with_reason(Reason::LowDisplacement).count(),
        0
    );
}

#[test]
fn malformed_metrics_are_fatal() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &moving_statestore());
    let run_dir = layout::run_dir(&fixture.case_dir("Priority", "SEED1"), "1");
    fs::write(run_dir.join(layout::RUN_DATA_FILE), r#"{"ticks": 5}"#).unwrap();

    let report = fixture.aggregate();
    assert!(report.is_broken());
    let malformed: Vec<_> = report
        .diagnostics
        .with_reason(Reason::MalformedArtifact)
        .collect();
    assert_eq!(malformed.len(), 1);
    assert_eq!(
        malformed[0].path.as_deref(),
        Some(run_dir.join(layout::RUN_DATA_FILE).as_path())
    );
}

#[test]
fn colliding_output_keys_are_fatal() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &moving_statestore());
    let run_dir = layout::run_dir(&fixture.case_dir("Priority", "SEED1"), "1");
    fs::write(run_dir.join(layout::RUN_DATA_FILE), r#"{"NoCollision": [1]}"#).unwrap();

    let report = fixture.aggregate();
    assert!(report.is_broken());
    assert_eq!(report.diagnostics.with_reason(Reason::KeyCollision).count(), 1);
}

#[test]
fn ragged_series_are_reported() {
    let fixture = Fixture::new();
    fixture.completed("Priority", "SEED1", 1, &moving_statestore());
    let run_dir = layout::run_dir(&fixture.case_dir("Priority", "SEED1"), "1");
    fs::write(run_dir.join(layout::RUN_DATA_FILE), r#"{"ticks": [1, 2]}"#).unwrap();

    let report = fixture.aggregate();
    assert!(!report.is_broken());
    let ragged: Vec<_> = report
        .diagnostics
        .with_reason(Reason::SeriesMisaligned)
        .collect();
    assert_eq!(ragged.len(), 1);
    assert!(ragged[0].message.contains("ticks"));
}
