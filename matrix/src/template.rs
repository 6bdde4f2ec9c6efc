//! Configuration template rendering and parsing.
//!
//! Templates are `KEY VALUE` lines. Rendering replaces the lines whose first
//! token is an overridden key and copies every other line byte for byte.

use std::fs;
use std::path::Path;

use campaign::Combination;

use crate::error::{GenerateError, GenerateResult};

/// A base configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTemplate {
    text: String,
}

impl ConfigTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a template from disk.
    pub fn load(path: &Path) -> GenerateResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { text })
    }

    /// Returns the raw template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterates the first token of every non-blank line.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .filter_map(|line| line.split_whitespace().next())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.keys().any(|candidate| candidate == key)
    }

    /// Checks that every key of `combination` has a line to override.
    pub fn ensure_keys(&self, combination: &Combination) -> GenerateResult<()> {
        match combination.iter().find(|(key, _)| !self.has_key(key)) {
            Some((key, _)) => Err(GenerateError::TemplateMissingKey {
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Renders the template with `overrides` applied.
    pub fn render(&self, overrides: &Combination) -> String {
        let mut out = String::with_capacity(self.text.len());
        for line in self.text.split_inclusive('\n') {
            let overridden = line
                .split_whitespace()
                .next()
                .and_then(|key| overrides.get(key).map(|value| (key, value)));
            match overridden {
                Some((key, value)) => {
                    out.push_str(key);
                    out.push(' ');
                    out.push_str(&value.to_string());
                    out.push_str(line_ending(line));
                }
                None => out.push_str(line),
            }
        }
        out
    }
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Parses `KEY VALUE` pairs the way the simulation does.
///
/// Reading stops at the first line that does not carry a numeric value.
pub fn parse_config_values(text: &str) -> Vec<(String, f64)> {
    let mut values = Vec::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(key), Some(raw)) = (tokens.next(), tokens.next()) else {
            break;
        };
        let Ok(value) = raw.parse::<f64>() else {
            break;
        };
        values.push((key.to_string(), value));
    }
    values
}
