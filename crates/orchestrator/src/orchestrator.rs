//! Sequential phase orchestration.
//!
//! Phases share one rate-limited target set, so they run strictly one at a
//! time in declared order with a fixed cooldown between them. A failed phase
//! is recorded and notified, then the run moves on.

use chrono::Local;
use phasescan_core::{PhaseOutcome, RunContext};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::cooldown::{Cooldown, TokioCooldown};
use crate::error::Result;
use crate::executor::{NucleiExecutor, PhaseExecutor};
use crate::notifier::{messages, notifier_from_config, Notifier, NullNotifier};
use crate::report::ReportAggregator;

/// What a completed orchestration leaves behind.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<PhaseOutcome>,
    pub report_path: PathBuf,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

pub struct PhaseOrchestrator {
    executor: Arc<dyn PhaseExecutor>,
    notifier: Arc<dyn Notifier>,
    cooldown: Arc<dyn Cooldown>,
    cooldown_duration: Duration,
    aggregator: Option<ReportAggregator>,
}

impl PhaseOrchestrator {
    pub fn new(executor: Arc<dyn PhaseExecutor>) -> Self {
        Self {
            executor,
            notifier: Arc::new(NullNotifier),
            cooldown: Arc::new(TokioCooldown),
            cooldown_duration: crate::config::DEFAULT_PHASE_COOLDOWN,
            aggregator: None,
        }
    }

    /// Production wiring: nuclei executor, webhook notifier if configured,
    /// real sleeps.
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(Arc::new(NucleiExecutor::from_config(config)))
            .with_notifier(notifier_from_config(config))
            .with_cooldown_duration(config.phase_cooldown)
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Arc<dyn Cooldown>) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_cooldown_duration(mut self, duration: Duration) -> Self {
        self.cooldown_duration = duration;
        self
    }

    /// Fix the report section order. Defaults to declared phase order.
    pub fn with_aggregator(mut self, aggregator: ReportAggregator) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Run every phase once, then write the report.
    ///
    /// Phase failures never surface here; the only error is failing to write
    /// the report.
    pub async fn run(&self, ctx: &RunContext) -> Result<RunReport> {
        let phases = ctx.phases();
        let mut outcomes = Vec::with_capacity(phases.len());

        info!(
            phases = phases.len(),
            output_dir = %ctx.output_dir().display(),
            "Starting phased scan"
        );

        for (index, phase) in phases.iter().enumerate() {
            info!(
                phase = %phase.name(),
                position = index + 1,
                total = phases.len(),
                "Phase starting"
            );

            let outcome = self.executor.execute(ctx, phase).await;
            if !outcome.is_success() {
                warn!(
                    phase = %phase.name(),
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "Phase failed, continuing with next phase"
                );
            }

            let message = messages::phase_finished(&outcome, &ctx.artifact_path(phase));
            self.notifier.notify(&message).await;
            outcomes.push(outcome);

            if index + 1 < phases.len() {
                info!(
                    cooldown_secs = self.cooldown_duration.as_secs_f64(),
                    "Cooling down before next phase"
                );
                self.cooldown.pause(self.cooldown_duration).await;
            }
        }

        let aggregator = self
            .aggregator
            .clone()
            .unwrap_or_else(|| ReportAggregator::from_phases(phases));
        let report_path = aggregator.write(ctx, Local::now()).await?;
        self.notifier.notify(&messages::report_ready()).await;

        let report = RunReport {
            outcomes,
            report_path,
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_secs = (Local::now() - ctx.started_at()).num_seconds(),
            report = %report.report_path.display(),
            "Phased scan finished"
        );
        Ok(report)
    }
}
