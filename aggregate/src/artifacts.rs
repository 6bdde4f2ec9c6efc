//! Loading the artifacts of one case.

use std::fs;
use std::path::{Path, PathBuf};

use campaign::{CaseRef, Diagnostic, Reason};
use matrix::layout::{self, CONTROLLED_VARS_FILE, RUN_ARTIFACTS};
use serde_json::{Map, Value};

use crate::liveness::{check_enemy_drone_alive, parse_statestore, LivenessReport};
use crate::metrics::{FlatMetrics, NestedMetrics};
use crate::options::AggregateOptions;
use crate::overhead::{get_overhead_info, OverheadSeries};

/// Every parsed artifact of a completed case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArtifacts {
    pub liveness: LivenessReport,
    pub overhead: OverheadSeries,
    pub controlled_vars: Value,
    pub coordinator_activity: NestedMetrics,
    pub data: NestedMetrics,
    pub run_data: FlatMetrics,
}

/// Paths of the files a completed case must provide.
pub fn expected_files(case_dir: &Path, run_id: &str) -> Vec<PathBuf> {
    let run_dir = layout::run_dir(case_dir, run_id);
    let mut files = vec![case_dir.join(CONTROLLED_VARS_FILE)];
    files.extend(RUN_ARTIFACTS.iter().map(|name| run_dir.join(name)));
    files
}

/// Loads and parses one case.
///
/// Every missing file is reported before anything is parsed, and every
/// malformed file is reported before giving up, so a single scan surfaces all
/// problems of the case.
pub fn load_case(
    case_dir: &Path,
    case: &CaseRef,
    options: &AggregateOptions,
) -> Result<CaseArtifacts, Vec<Diagnostic>> {
    let missing: Vec<Diagnostic> = expected_files(case_dir, &options.run_id)
        .into_iter()
        .filter(|path| !path.is_file())
        .map(|path| {
            Diagnostic::new(Reason::MissingArtifact, "expected artifact not found")
                .with_case(case.clone())
                .with_path(path)
        })
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    let run_dir = layout::run_dir(case_dir, &options.run_id);
    let mut loader = Loader {
        case,
        problems: Vec::new(),
    };

    let liveness = loader
        .parse(&run_dir.join(layout::STATESTORE_LOG), parse_statestore)
        .map(|samples| check_enemy_drone_alive(&samples, options));
    let overhead = loader.parse(&run_dir.join(layout::RUN_LOG), |text| {
        get_overhead_info(text, options)
    });
    let controlled_vars = loader.parse(&case_dir.join(CONTROLLED_VARS_FILE), |text| {
        serde_json::from_str::<Map<String, Value>>(text).map(Value::Object)
    });
    let coordinator_activity = loader.parse(
        &run_dir.join(layout::COORDINATOR_ACTIVITY_FILE),
        NestedMetrics::from_json,
    );
    let data = loader.parse(&run_dir.join(layout::DATA_FILE), NestedMetrics::from_json);
    let run_data = loader.parse(&run_dir.join(layout::RUN_DATA_FILE), FlatMetrics::from_json);

    match (
        liveness,
        overhead,
        controlled_vars,
        coordinator_activity,
        data,
        run_data,
    ) {
        (
            Some(liveness),
            Some(overhead),
            Some(controlled_vars),
            Some(coordinator_activity),
            Some(data),
            Some(run_data),
        ) => Ok(CaseArtifacts {
            liveness,
            overhead,
            controlled_vars,
            coordinator_activity,
            data,
            run_data,
        }),
        _ => Err(loader.problems),
    }
}

struct Loader<'a> {
    case: &'a CaseRef,
    problems: Vec<Diagnostic>,
}

impl Loader<'_> {
    fn parse<T, E, F>(&mut self, path: &Path, parse: F) -> Option<T>
    where
        E: std::fmt::Display,
        F: FnOnce(&str) -> Result<T, E>,
    {
        let result = match fs::read_to_string(path) {
            Ok(text) => parse(&text).map_err(|err| format!("failed to parse: {err}")),
            Err(err) => Err(format!("failed to read: {err}")),
        };
        result
            .map_err(|message| {
                self.problems.push(
                    Diagnostic::new(Reason::MalformedArtifact, message)
                        .with_case(self.case.clone())
                        .with_path(path),
                );
            })
            .ok()
    }
}
