//! Read-only progress survey of a test directory.

use std::io;
use std::path::Path;

use matrix::layout;
use serde::Serialize;

use crate::artifacts::expected_files;
use crate::error::{AggregateError, AggregateResult};
use crate::scan::sorted_subdirs;

/// Progress of one coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStatus {
    pub coordinator: String,
    /// Case directories matching the filter.
    pub cases: usize,
    /// Cases with a `results/` directory.
    pub with_results: usize,
    /// Cases with every artifact the aggregator reads.
    pub complete: usize,
}

impl CoordinatorStatus {
    /// Cases that have started but are missing artifacts.
    pub const fn incomplete(&self) -> usize {
        self.with_results.saturating_sub(self.complete)
    }
}

/// Counts case progress per coordinator, considering only case names
/// accepted by `filter`.
pub fn survey<F>(
    root: &Path,
    run_id: &str,
    filter: F,
) -> AggregateResult<Vec<CoordinatorStatus>>
where
    F: Fn(&str) -> bool,
{
    let mut statuses = Vec::new();
    for coordinator in sorted_subdirs(root).map_err(io_error(root))? {
        let coordinator_dir = layout::coordinator_dir(root, &coordinator);
        let mut status = CoordinatorStatus {
            coordinator,
            ..CoordinatorStatus::default()
        };
        for case in sorted_subdirs(&coordinator_dir).map_err(io_error(&coordinator_dir))? {
            if !filter(&case) {
                continue;
            }
            let case_dir = coordinator_dir.join(&case);
            status.cases += 1;
            if layout::results_dir(&case_dir).is_dir() {
                status.with_results += 1;
            }
            if expected_files(&case_dir, run_id)
                .iter()
                .all(|path| path.is_file())
            {
                status.complete += 1;
            }
        }
        tracing::debug!(
            coordinator = status.coordinator.as_str(),
            cases = status.cases,
            "surveyed coordinator"
        );
        statuses.push(status);
    }
    Ok(statuses)
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> AggregateError {
    let path = path.to_path_buf();
    move |source| AggregateError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_case(root: &Path, coordinator: &str, case: &str, artifacts: &[&str]) {
        let case_dir = layout::case_dir(root, coordinator, case);
        let run_dir = layout::run_dir(&case_dir, "1");
        fs::create_dir_all(&case_dir).unwrap();
        fs::write(case_dir.join(layout::CONTROLLED_VARS_FILE), "{}").unwrap();
        if !artifacts.is_empty() {
            fs::create_dir_all(&run_dir).unwrap();
        }
        for name in artifacts {
            fs::write(run_dir.join(name), "").unwrap();
        }
    }

    #[test]
    fn counts_progress_per_coordinator() {
        let dir = tempfile::tempdir().unwrap();
        touch_case(dir.path(), "Alpha", "SEED1", &layout::RUN_ARTIFACTS);
        touch_case(dir.path(), "Alpha", "SEED2", &[layout::RUN_LOG]);
        touch_case(dir.path(), "Alpha", "SEED3", &[]);
        touch_case(dir.path(), "Beta", "SEED1", &[]);

        let statuses = survey(dir.path(), "1", |_| true).unwrap();
        assert_eq!(
            statuses[0],
            CoordinatorStatus {
                coordinator: "Alpha".to_string(),
                cases: 3,
                with_results: 2,
                complete: 1,
            }
        );
        assert_eq!(statuses[0].incomplete(), 1);
        assert_eq!(statuses[1].coordinator, "Beta");
        assert_eq!(statuses[1].with_results, 0);
    }

    #[test]
    fn filter_limits_cases() {
        let dir = tempfile::tempdir().unwrap();
        touch_case(dir.path(), "Alpha", "SEED1", &[]);
        touch_case(dir.path(), "Alpha", "OTHER", &[]);
        let statuses = survey(dir.path(), "1", |name| name.starts_with("SEED")).unwrap();
        assert_eq!(statuses[0].cases, 1);
    }
}
