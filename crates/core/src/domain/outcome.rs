use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Succeeded,
    Failed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub label: String,
    pub status: PhaseStatus,
    /// Raw scanner output. Only set when the scanner exited cleanly and the
    /// file was actually written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl PhaseOutcome {
    pub fn succeeded(label: impl Into<String>, artifact: Option<PathBuf>) -> Self {
        Self {
            label: label.into(),
            status: PhaseStatus::Succeeded,
            artifact,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn failed(label: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: PhaseStatus::Failed,
            artifact: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == PhaseStatus::Succeeded
    }
}
