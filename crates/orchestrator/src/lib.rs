pub mod config;
pub mod cooldown;
pub mod error;
pub mod executor;
pub mod notifier;
pub mod orchestrator;
pub mod provisioner;
pub mod report;
pub mod run;

pub use config::OrchestratorConfig;
pub use cooldown::{Cooldown, TokioCooldown};
pub use error::{OrchestratorError, Result};
pub use executor::{NucleiExecutor, PhaseExecutor};
pub use notifier::{notifier_from_config, Notifier, NullNotifier, WebhookNotifier};
pub use orchestrator::{PhaseOrchestrator, RunReport};
pub use provisioner::TargetProvisioner;
pub use report::ReportAggregator;
pub use run::{create_run_dir, RunSummary, ScanRun};
