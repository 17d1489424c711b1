use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::{Component, Path, PathBuf};

use super::run::{REPORT_FILE, TARGETS_FILE};
use crate::error::{CoreError, Result};

const fn non_zero(value: u32) -> NonZeroU32 {
    match NonZeroU32::new(value) {
        Some(v) => v,
        None => panic!("value must be non-zero"),
    }
}

/// Default number of concurrent templates per phase.
pub const DEFAULT_CONCURRENCY: NonZeroU32 = non_zero(25);
/// Default requests-per-second cap per phase.
pub const DEFAULT_RATE_LIMIT: NonZeroU32 = non_zero(100);

fn default_concurrency() -> NonZeroU32 {
    DEFAULT_CONCURRENCY
}

fn default_rate_limit() -> NonZeroU32 {
    DEFAULT_RATE_LIMIT
}

/// Severity levels and capability tags narrowing which checks a phase runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    severities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

impl Selector {
    pub fn new<S, T>(severities: S, tags: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            severities: severities.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn severities(&self) -> &[String] {
        &self.severities
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.severities.is_empty() && self.tags.is_empty()
    }

    /// Comma-joined severities, or `None` when the phase has no severity filter.
    pub fn severity_arg(&self) -> Option<String> {
        join_non_empty(&self.severities)
    }

    /// Comma-joined tags, or `None` when the phase has no tag filter.
    pub fn tags_arg(&self) -> Option<String> {
        join_non_empty(&self.tags)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.is_empty() {
            return Err("selector needs at least one severity or tag".to_string());
        }
        for value in self.severities.iter().chain(self.tags.iter()) {
            if value.trim().is_empty() {
                return Err("selector contains a blank value".to_string());
            }
            if value.contains(',') {
                return Err(format!("selector value '{}' must not contain ','", value));
            }
        }
        Ok(())
    }
}

fn join_non_empty(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

/// One scan phase: a label, a selector, an output file and pacing parameters.
///
/// Definitions are built once when a run starts and never change afterwards,
/// so the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    name: String,
    #[serde(flatten)]
    selector: Selector,
    /// Artifact file name relative to the run directory. Defaults to `<name>.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    #[serde(default = "default_concurrency")]
    concurrency: NonZeroU32,
    #[serde(default = "default_rate_limit")]
    rate_limit: NonZeroU32,
}

impl PhaseDefinition {
    pub fn new(name: impl Into<String>, selector: Selector) -> Self {
        Self {
            name: name.into(),
            selector,
            output: None,
            concurrency: DEFAULT_CONCURRENCY,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_concurrency(mut self, concurrency: NonZeroU32) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: NonZeroU32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn concurrency(&self) -> NonZeroU32 {
        self.concurrency
    }

    pub fn rate_limit(&self) -> NonZeroU32 {
        self.rate_limit
    }

    /// File name of the raw scanner output, relative to the run directory.
    pub fn output_file(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.txt", self.name)))
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid_phase(&self.name, "name is empty"));
        }
        if name != self.name {
            return Err(CoreError::invalid_phase(
                &self.name,
                "name has surrounding whitespace",
            ));
        }
        if !is_plain_relative(Path::new(&self.name)) {
            return Err(CoreError::invalid_phase(
                &self.name,
                "name must be a single path component",
            ));
        }
        if let Some(output) = &self.output {
            if !is_plain_relative(output) {
                return Err(CoreError::invalid_phase(
                    &self.name,
                    format!(
                        "output '{}' must be a file name inside the run directory",
                        output.display()
                    ),
                ));
            }
        }
        self.selector
            .validate()
            .map_err(|reason| CoreError::invalid_phase(&self.name, reason))
    }
}

fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Validate an ordered phase list: non-empty, each phase valid, labels and
/// output files unique. No output may reuse the run's target list or report
/// file name.
pub fn validate_phases(phases: &[PhaseDefinition]) -> Result<()> {
    if phases.is_empty() {
        return Err(CoreError::NoPhases);
    }

    let mut names = HashSet::new();
    let mut outputs = HashSet::new();
    for phase in phases {
        phase.validate()?;
        let output = phase.output_file();
        if output == Path::new(TARGETS_FILE) || output == Path::new(REPORT_FILE) {
            return Err(CoreError::invalid_phase(
                phase.name(),
                format!("output '{}' is reserved by the run", output.display()),
            ));
        }
        if !names.insert(phase.name()) {
            return Err(CoreError::DuplicatePhase(phase.name().to_string()));
        }
        if !outputs.insert(phase.output_file()) {
            return Err(CoreError::Validation(format!(
                "output '{}' is used by more than one phase",
                phase.output_file().display()
            )));
        }
    }
    Ok(())
}

/// The built-in phase sequence: broad exposure checks first, then
/// low-hanging fruit, then the high-impact classes.
pub fn default_phases() -> Vec<PhaseDefinition> {
    vec![
        PhaseDefinition::new("info", Selector::new(["info"], ["exposure", "disclosure"])),
        PhaseDefinition::new("low", Selector::new(["low"], ["low-hanging"])),
        PhaseDefinition::new(
            "medium_high_critical",
            Selector::new(
                ["medium", "high", "critical"],
                ["rce", "sqli", "xss", "ssrf", "lfi", "auth"],
            ),
        ),
    ]
}
