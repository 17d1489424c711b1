//! Runs one phase as an external scanner process.

use async_trait::async_trait;
use phasescan_core::{PhaseDefinition, PhaseOutcome, RunContext};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;

/// Executes a single phase and reports how it went.
///
/// Implementations never fail the caller: every problem is folded into a
/// [`PhaseOutcome`] with status `Failed`.
#[async_trait]
pub trait PhaseExecutor: Send + Sync {
    async fn execute(&self, ctx: &RunContext, phase: &PhaseDefinition) -> PhaseOutcome;
}

/// Invokes the `nuclei` binary with a structured argument list. No shell is
/// involved, so target and path values are never interpreted as syntax.
#[derive(Debug, Clone)]
pub struct NucleiExecutor {
    binary: PathBuf,
    templates_dir: PathBuf,
    retries: u32,
}

impl NucleiExecutor {
    pub fn new(binary: impl Into<PathBuf>, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            templates_dir: templates_dir.into(),
            retries: crate::config::DEFAULT_RETRIES,
        }
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(&config.scanner_binary, &config.templates_dir).with_retries(config.retries)
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Argument list for one phase, in the order the scanner documents them.
    pub fn build_args(&self, ctx: &RunContext, phase: &PhaseDefinition) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-l".into(),
            ctx.targets_path().into(),
            "-t".into(),
            self.templates_dir.clone().into(),
        ];

        let selector = phase.selector();
        if let Some(severities) = selector.severity_arg() {
            args.push("-s".into());
            args.push(severities.into());
        }
        if let Some(tags) = selector.tags_arg() {
            args.push("-tags".into());
            args.push(tags.into());
        }

        let pacing: [OsString; 9] = [
            "-c".into(),
            phase.concurrency().to_string().into(),
            "-rl".into(),
            phase.rate_limit().to_string().into(),
            "-retries".into(),
            self.retries.to_string().into(),
            "-o".into(),
            ctx.artifact_path(phase).into(),
            "-silent".into(),
        ];
        args.extend(pacing);
        args
    }
}

#[async_trait]
impl PhaseExecutor for NucleiExecutor {
    async fn execute(&self, ctx: &RunContext, phase: &PhaseDefinition) -> PhaseOutcome {
        let artifact = ctx.artifact_path(phase);
        let args = self.build_args(ctx, phase);

        info!(
            phase = %phase.name(),
            severities = ?phase.selector().severity_arg(),
            tags = ?phase.selector().tags_arg(),
            "Running scanner"
        );
        debug!(binary = %self.binary.display(), args = ?args, "Scanner invocation");

        let started = Instant::now();
        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let outcome = match status {
            Ok(status) if status.success() => {
                let produced = tokio::fs::try_exists(&artifact).await.unwrap_or(false);
                if !produced {
                    debug!(phase = %phase.name(), "Scanner succeeded without writing output");
                }
                PhaseOutcome::succeeded(phase.name(), produced.then_some(artifact))
            }
            Ok(status) => PhaseOutcome::failed(
                phase.name(),
                format!("{} exited with {}", self.binary.display(), status),
            ),
            Err(e) => PhaseOutcome::failed(
                phase.name(),
                format!("failed to launch {}: {}", self.binary.display(), e),
            ),
        }
        .with_duration(duration_ms);

        match &outcome.error {
            None => info!(phase = %phase.name(), duration_ms, "Scanner finished"),
            Some(error) => warn!(phase = %phase.name(), error = %error, "Scanner failed"),
        }

        outcome
    }
}
