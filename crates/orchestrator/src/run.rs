//! End-to-end run: provisioning, orchestration, report.

use chrono::{DateTime, Local};
use phasescan_core::{run_dir_name, validate_phases, RunContext, TargetInput};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::notifier::messages;
use crate::orchestrator::{PhaseOrchestrator, RunReport};
use crate::provisioner::TargetProvisioner;

/// Suffixes tried when a run directory with the same timestamp exists.
const MAX_RUN_DIR_SUFFIX: u32 = 100;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub targets_path: PathBuf,
    pub report: RunReport,
}

pub struct ScanRun {
    config: OrchestratorConfig,
    orchestrator: PhaseOrchestrator,
}

impl ScanRun {
    pub fn new(config: OrchestratorConfig) -> Self {
        let orchestrator = PhaseOrchestrator::from_config(&config);
        Self {
            config,
            orchestrator,
        }
    }

    /// Use a custom orchestrator, e.g. with a fake executor.
    ///
    /// The orchestrator's executor, notifier and cooldown are used as given.
    /// Its cooldown duration is replaced by `config.phase_cooldown`, so
    /// `config.webhook_url` and `config.scanner_binary` only take effect
    /// through [`ScanRun::new`].
    pub fn with_orchestrator(config: OrchestratorConfig, orchestrator: PhaseOrchestrator) -> Self {
        let orchestrator = orchestrator.with_cooldown_duration(config.phase_cooldown);
        Self {
            config,
            orchestrator,
        }
    }

    /// Execute one run.
    ///
    /// Missing input, an invalid phase list, an empty target or a missing
    /// list file are all rejected before the run directory is created.
    pub async fn execute(&self, input: Option<TargetInput>) -> Result<RunSummary> {
        let input = input.ok_or(OrchestratorError::NoTargets)?;
        validate_phases(&self.config.phases)?;
        TargetProvisioner::preflight(&input).await?;

        let started_at = Local::now();
        let output_dir = create_run_dir(&self.config.output_base, &started_at).await?;
        let ctx = RunContext::new(output_dir, self.config.phases.clone(), started_at);

        let targets_path = TargetProvisioner::provision(&input, &ctx.targets_path()).await?;
        info!(
            targets = %targets_path.display(),
            output_dir = %ctx.output_dir().display(),
            "Run prepared"
        );

        self.orchestrator
            .notifier()
            .notify(&messages::run_started())
            .await;

        let report = self.orchestrator.run(&ctx).await?;

        Ok(RunSummary {
            output_dir: ctx.output_dir().to_path_buf(),
            targets_path,
            report,
        })
    }
}

/// Create `<base>/scan_<timestamp>`, adding `_1`, `_2`, ... if another run
/// already claimed the name.
pub async fn create_run_dir(base: &Path, started_at: &DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(base)
        .await
        .map_err(|source| OrchestratorError::RunDirectory {
            path: base.to_path_buf(),
            source,
        })?;

    let name = run_dir_name(started_at);
    for suffix in 0..MAX_RUN_DIR_SUFFIX {
        let candidate = if suffix == 0 {
            base.join(&name)
        } else {
            base.join(format!("{}_{}", name, suffix))
        };
        match fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(OrchestratorError::RunDirectory {
                    path: candidate,
                    source,
                })
            }
        }
    }

    Err(OrchestratorError::RunDirectory {
        path: base.join(name),
        source: std::io::Error::new(
            ErrorKind::AlreadyExists,
            "no free run directory name for this timestamp",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_run_dir_is_unique() {
        let base = TempDir::new().unwrap();
        let started = Local.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();

        let first = create_run_dir(base.path(), &started).await.unwrap();
        let second = create_run_dir(base.path(), &started).await.unwrap();

        assert_eq!(first, base.path().join("scan_20250203_040506"));
        assert_eq!(second, base.path().join("scan_20250203_040506_1"));
        assert!(first.is_dir());
        assert!(second.is_dir());
    }

    #[tokio::test]
    async fn test_create_run_dir_creates_base() {
        let root = TempDir::new().unwrap();
        let base = root.path().join("nested").join("output");
        let dir = create_run_dir(&base, &Local::now()).await.unwrap();
        assert!(dir.starts_with(&base));
        assert!(dir.is_dir());
    }
}
