//! Test matrix generation: plan the cases, then write one directory per case
//! per coordinator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use campaign::{
    Campaign, CaseRef, Combination, ConfigParameterSpace, Diagnostic, Diagnostics, Reason,
    WEIGHT_CATALOG,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::case::{plan_cases, TestCase};
use crate::error::{GenerateError, GenerateResult};
use crate::layout::{self, CONTROLLED_VARS_FILE, START_POS_FILE};
use crate::template::ConfigTemplate;

/// Tunables for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Name of the rendered configuration file inside each case directory.
    pub config_file_name: String,
    /// Seed for the sample and weight draws; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            config_file_name: layout::CONFIG_FILE.to_string(),
            seed: None,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Planned cases in case order.
    pub cases: Vec<TestCase>,
    /// Case directories that were fully written.
    pub written: Vec<PathBuf>,
    /// Recoverable problems hit while writing.
    pub diagnostics: Diagnostics,
}

/// Generates test matrices for a campaign.
#[derive(Debug)]
pub struct MatrixGenerator {
    campaign: Campaign,
    space: ConfigParameterSpace,
    template: ConfigTemplate,
    options: GenerateOptions,
    rng: StdRng,
}

impl MatrixGenerator {
    /// Creates a generator, validating the campaign against the template.
    pub fn new(
        campaign: Campaign,
        template: ConfigTemplate,
        options: GenerateOptions,
    ) -> GenerateResult<Self> {
        campaign.validate()?;
        let space = campaign.space()?;

        let mut keys = Combination::new();
        for param in space.parameters() {
            if let Some(value) = param.values.first() {
                keys.set(param.name.clone(), *value);
            }
        }
        WEIGHT_CATALOG[0].apply(&mut keys);
        template.ensure_keys(&keys)?;

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            campaign,
            space,
            template,
            options,
            rng,
        })
    }

    pub const fn space(&self) -> &ConfigParameterSpace {
        &self.space
    }

    pub fn coordinators(&self) -> &[String] {
        &self.campaign.coordinators
    }

    /// Plans `count` cases without touching the file system.
    pub fn plan(&mut self, count: usize) -> GenerateResult<Vec<TestCase>> {
        plan_cases(&self.space, count, &WEIGHT_CATALOG, &mut self.rng)
    }

    /// Plans `count` cases and materializes them under `root`.
    ///
    /// Sampling problems are returned as errors before anything is written.
    /// Per-directory failures are recorded in the report and the remaining
    /// cases are still written. Existing directories are reused.
    pub fn generate(&mut self, root: &Path, count: usize) -> GenerateResult<GenerateReport> {
        let cases = self.plan(count)?;
        fs::create_dir_all(root).map_err(|source| GenerateError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        let mut diagnostics = Diagnostics::new();
        for coordinator in &self.campaign.coordinators {
            let coordinator_dir = layout::coordinator_dir(root, coordinator);
            if let Err(err) = fs::create_dir_all(&coordinator_dir) {
                diagnostics.push(
                    Diagnostic::new(
                        Reason::DirectoryCreateFailed,
                        format!("failed to create coordinator directory: {err}"),
                    )
                    .with_path(&coordinator_dir),
                );
            }

            for case in &cases {
                let id = case.id();
                let case_dir = coordinator_dir.join(&id);
                match write_case(&case_dir, &self.template, &self.options, case) {
                    Ok(()) => written.push(case_dir),
                    Err(failure) => diagnostics.push(
                        failure.into_diagnostic().with_case(CaseRef::new(coordinator, id)),
                    ),
                }
            }
            tracing::info!(
                coordinator = coordinator.as_str(),
                cases = cases.len(),
                "materialized coordinator cases"
            );
        }

        Ok(GenerateReport {
            cases,
            written,
            diagnostics,
        })
    }
}

/// A per-case write failure.
#[derive(Debug)]
struct CaseWriteFailure {
    reason: Reason,
    path: PathBuf,
    source: io::Error,
}

impl CaseWriteFailure {
    fn into_diagnostic(self) -> Diagnostic {
        let what = match self.reason {
            Reason::DirectoryCreateFailed => "failed to create case directory",
            _ => "failed to write case artifact",
        };
        Diagnostic::new(self.reason, format!("{what}: {}", self.source)).with_path(self.path)
    }
}

/// Writes the three artifacts of one case directory.
fn write_case(
    case_dir: &Path,
    template: &ConfigTemplate,
    options: &GenerateOptions,
    case: &TestCase,
) -> Result<(), CaseWriteFailure> {
    fs::create_dir_all(case_dir).map_err(|source| CaseWriteFailure {
        reason: Reason::DirectoryCreateFailed,
        path: case_dir.to_path_buf(),
        source,
    })?;

    let controlled_vars = serde_json::to_string(&case.controlled_vars())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err));
    let artifacts = [
        (
            case_dir.join(&options.config_file_name),
            Ok(template.render(&case.combination)),
        ),
        (case_dir.join(CONTROLLED_VARS_FILE), controlled_vars),
        (case_dir.join(START_POS_FILE), Ok(case.position.to_string())),
    ];
    for (path, contents) in artifacts {
        contents
            .and_then(|contents| fs::write(&path, contents))
            .map_err(|source| CaseWriteFailure {
                reason: Reason::CaseWriteFailed,
                path,
                source,
            })?;
    }
    Ok(())
}
