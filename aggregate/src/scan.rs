//! The aggregation scan over a test directory.

use std::fs;
use std::io;
use std::path::Path;

use campaign::{CaseRef, Diagnostic, Diagnostics, Reason, Severity};
use indexmap::IndexMap;
use matrix::layout;

use crate::artifacts::load_case;
use crate::dataset::AggregatedDataset;
use crate::error::{AggregateError, AggregateResult};
use crate::options::AggregateOptions;

/// Walks a test directory and merges every coordinator's results.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    options: AggregateOptions,
}

impl Aggregator {
    pub const fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// Scans `root` and aggregates every coordinator found there.
    ///
    /// Coordinators and cases are visited in sorted name order. For each
    /// coordinator the scan stops at the first case that no coordinator has
    /// results for. Problems inside cases are recorded as diagnostics and the
    /// scan continues, so one pass reports all of them.
    pub fn aggregate(&self, root: &Path) -> AggregateResult<AggregateReport> {
        let coordinators = sorted_subdirs(root).map_err(|source| AggregateError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut diagnostics = Diagnostics::new();
        let mut datasets = IndexMap::new();
        for coordinator in &coordinators {
            let dataset =
                self.aggregate_coordinator(root, coordinator, &coordinators, &mut diagnostics)?;
            tracing::info!(
                coordinator = coordinator.as_str(),
                cases = dataset.case_count(),
                "aggregated coordinator"
            );
            datasets.insert(coordinator.clone(), dataset);
        }

        let mut report = AggregateReport {
            datasets,
            diagnostics,
        };
        report.check_consistency();
        Ok(report)
    }

    fn aggregate_coordinator(
        &self,
        root: &Path,
        coordinator: &str,
        coordinators: &[String],
        diagnostics: &mut Diagnostics,
    ) -> AggregateResult<AggregatedDataset> {
        let coordinator_dir = layout::coordinator_dir(root, coordinator);
        let cases = sorted_subdirs(&coordinator_dir).map_err(|source| AggregateError::Io {
            path: coordinator_dir.clone(),
            source,
        })?;

        let mut dataset = AggregatedDataset::new();
        for case in cases {
            let case_ref = CaseRef::new(coordinator, case.as_str());
            let any_results = coordinators.iter().any(|other| {
                layout::results_dir(&layout::case_dir(root, other, &case)).exists()
            });
            if !any_results {
                diagnostics.push(
                    Diagnostic::new(
                        Reason::EndOfData,
                        "no coordinator has results for this case; stopping here",
                    )
                    .with_case(case_ref),
                );
                break;
            }

            let case_dir = coordinator_dir.join(&case);
            match load_case(&case_dir, &case_ref, &self.options) {
                Ok(artifacts) => {
                    if let Some(reason) = artifacts.liveness.verdict.reason() {
                        diagnostics.push(
                            Diagnostic::new(
                                reason,
                                format!(
                                    "probably bad data, {}: {} moving ticks, displacement {:.2}",
                                    artifacts.liveness.verdict,
                                    artifacts.liveness.moving_ticks,
                                    artifacts.liveness.displacement
                                ),
                            )
                            .with_case(case_ref.clone())
                            .with_path(layout::run_dir(&case_dir, &self.options.run_id)),
                        );
                    }
                    dataset.add_case(artifacts);
                }
                Err(problems) => diagnostics.extend(problems),
            }
        }
        Ok(dataset)
    }
}

/// Result of a scan: the merged datasets and everything noticed on the way.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Datasets keyed by coordinator, in sorted coordinator order.
    pub datasets: IndexMap<String, AggregatedDataset>,
    pub diagnostics: Diagnostics,
}

impl AggregateReport {
    /// True when the output must not be written.
    pub fn is_broken(&self) -> bool {
        self.diagnostics.is_broken()
    }

    /// Merged case count per coordinator.
    pub fn case_counts(&self) -> IndexMap<&str, usize> {
        self.datasets
            .iter()
            .map(|(name, dataset)| (name.as_str(), dataset.case_count()))
            .collect()
    }

    /// The common case count, if every coordinator has the same one.
    pub fn uniform_case_count(&self) -> Option<usize> {
        let mut counts = self.datasets.values().map(AggregatedDataset::case_count);
        let first = counts.next()?;
        counts.all(|count| count == first).then_some(first)
    }

    /// Serializes the datasets as one JSON document.
    pub fn to_json(&self) -> AggregateResult<String> {
        if self.is_broken() {
            return Err(AggregateError::Broken {
                fatal: self.diagnostics.count(Severity::Fatal),
            });
        }
        serde_json::to_string(&self.datasets)
            .map_err(|source| AggregateError::Serialize { source })
    }

    /// Writes the output file, refusing when the scan is broken.
    pub fn write_json(&self, path: &Path) -> AggregateResult<()> {
        let contents = self.to_json()?;
        fs::write(path, contents).map_err(|source| AggregateError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Post-scan checks: key collisions, series alignment and case counts.
    fn check_consistency(&mut self) {
        for (coordinator, dataset) in &self.datasets {
            for key in dataset.key_collisions() {
                self.diagnostics.push(Diagnostic::new(
                    Reason::KeyCollision,
                    format!("{coordinator}: output key {key:?} has more than one source"),
                ));
            }
            for misaligned in dataset.misaligned_series() {
                self.diagnostics.push(Diagnostic::new(
                    Reason::SeriesMisaligned,
                    format!(
                        "{coordinator}: series {} has {} entries for {} cases",
                        misaligned.series, misaligned.len, misaligned.expected
                    ),
                ));
            }
        }

        if self.is_broken() || self.datasets.is_empty() {
            return;
        }
        match self.uniform_case_count() {
            Some(count) => {
                tracing::info!(cases = count, "collected data for each coordinator");
            }
            None => {
                let breakdown = self
                    .case_counts()
                    .iter()
                    .map(|(name, count)| format!("{name}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.diagnostics.push(Diagnostic::new(
                    Reason::CaseCountMismatch,
                    format!("not all coordinators have the same number of cases ({breakdown})"),
                ));
            }
        }
    }
}

/// Names of the subdirectories of `dir`, sorted.
pub(crate) fn sorted_subdirs(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
