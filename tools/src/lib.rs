//! Command-line support for coordinator evaluation campaigns.
//!
//! This crate backs the `coordeval` binary:
//!
//! - Logging setup
//! - Working-directory and campaign-file handling
//! - Case-name filters for the status survey
//! - Human-readable summaries of reports
//!
//! # Design Principles
//!
//! - **Libraries decide, the CLI reports** - Everything here formats what the
//!   pipelines return; no pipeline logic lives in the binary.
//! - **Human-readable output** - Summaries go to stdout, diagnostics to the log.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use aggregate::CoordinatorStatus;
use anyhow::{bail, Context, Result};
use campaign::{Campaign, Diagnostics, Severity};
use glob::Pattern;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Directory the simulation expects to be launched from.
pub const REQUIRED_CWD: &str = "missionapp";

/// Installs the `tracing` subscriber, honoring `RUST_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Fails unless `dir` is named `expected`.
pub fn ensure_working_dir(dir: &Path, expected: &str) -> Result<()> {
    let name = dir.file_name().and_then(|name| name.to_str());
    if name != Some(expected) {
        bail!(
            "must be run from the {expected} directory (current: {}); pass --any-cwd to skip this check",
            dir.display()
        );
    }
    Ok(())
}

/// Loads a campaign file, or the built-in drone campaign when `path` is `None`.
pub fn load_campaign(path: Option<&Path>) -> Result<Campaign> {
    let Some(path) = path else {
        return Ok(Campaign::drone());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read campaign {}", path.display()))?;
    Campaign::from_json(&contents).with_context(|| format!("invalid campaign {}", path.display()))
}

/// Case-name filter for the status survey.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pattern: Option<Pattern>,
}

impl CaseFilter {
    pub fn new(glob: Option<&str>) -> Result<Self> {
        let pattern = glob
            .map(|value| Pattern::new(value).context("invalid glob pattern"))
            .transpose()?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, case: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |pattern| pattern.matches(case))
    }
}

/// One-line count of diagnostics by severity.
pub fn format_diagnostic_counts(diagnostics: &Diagnostics) -> String {
    format!(
        "{} fatal, {} warnings, {} notes",
        diagnostics.count(Severity::Fatal),
        diagnostics.count(Severity::Recoverable),
        diagnostics.count(Severity::Informational)
    )
}

/// Fixed-width progress table.
pub fn format_status_table(statuses: &[CoordinatorStatus]) -> String {
    let width = statuses
        .iter()
        .map(|status| status.coordinator.len())
        .chain([11])
        .max()
        .unwrap_or(11);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>6}  {:>8}  {:>8}  {:>10}",
        "coordinator", "cases", "results", "complete", "incomplete"
    );
    for status in statuses {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>8}  {:>8}  {:>10}",
            status.coordinator,
            status.cases,
            status.with_results,
            status.complete,
            status.incomplete()
        );
    }
    out
}

/// Survey rows as a pretty JSON array.
pub fn format_status_json(statuses: &[CoordinatorStatus]) -> Result<String> {
    serde_json::to_string_pretty(statuses).context("serialize status")
}

/// Writes `value` as pretty JSON.
pub fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
