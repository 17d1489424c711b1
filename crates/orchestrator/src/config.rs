use phasescan_core::{default_phases, PhaseDefinition};
use std::path::PathBuf;
use std::time::Duration;

/// Pause between two phases.
pub const DEFAULT_PHASE_COOLDOWN: Duration = Duration::from_secs(30);
/// Upper bound on a single notification request.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-target retries handed to the scanner.
pub const DEFAULT_RETRIES: u32 = 1;

/// Everything a run needs, passed explicitly to the run driver and the
/// orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub scanner_binary: PathBuf,
    pub templates_dir: PathBuf,
    /// Parent directory of the per-run `scan_<timestamp>` directories.
    pub output_base: PathBuf,
    pub phase_cooldown: Duration,
    pub retries: u32,
    pub webhook_url: Option<String>,
    pub notify_timeout: Duration,
    pub phases: Vec<PhaseDefinition>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            scanner_binary: PathBuf::from("nuclei"),
            templates_dir: PathBuf::from("nuclei-templates"),
            output_base: PathBuf::from("output"),
            phase_cooldown: DEFAULT_PHASE_COOLDOWN,
            retries: DEFAULT_RETRIES,
            webhook_url: None,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            phases: default_phases(),
        }
    }
}

impl OrchestratorConfig {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_scanner_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.scanner_binary = binary.into();
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn with_output_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.output_base = base.into();
        self
    }

    pub fn with_phase_cooldown(mut self, cooldown: Duration) -> Self {
        self.phase_cooldown = cooldown;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Blank URLs disable notifications.
    pub fn with_webhook_url(mut self, url: Option<String>) -> Self {
        self.webhook_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    pub fn with_phases(mut self, phases: Vec<PhaseDefinition>) -> Self {
        self.phases = phases;
        self
    }
}
