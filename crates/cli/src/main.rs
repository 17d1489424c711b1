mod config;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use orchestrator::{OrchestratorConfig, OrchestratorError, RunSummary, ScanRun};
use phasescan_core::TargetInput;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{base_config, FileConfig};

const EXIT_FATAL: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "phasescan")]
#[command(about = "Run phased nuclei scans and build one consolidated report", long_about = None)]
#[command(version)]
struct Cli {
    /// Single target URL
    #[arg(short, long)]
    url: Option<String>,

    /// File containing target URLs, one per line
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Nuclei templates directory
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Path to the nuclei binary
    #[arg(long)]
    binary: Option<PathBuf>,

    /// Parent directory for per-run output directories
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Seconds to wait between phases
    #[arg(long)]
    cooldown: Option<u64>,

    /// Webhook receiving status messages
    #[arg(long, env = "PHASESCAN_WEBHOOK_URL")]
    webhook: Option<String>,
}

impl Cli {
    fn target_input(&self) -> Option<TargetInput> {
        TargetInput::from_args(self.url.clone(), self.list.clone())
    }

    fn apply(&self, mut config: OrchestratorConfig) -> OrchestratorConfig {
        if let Some(dir) = &self.templates {
            config = config.with_templates_dir(dir);
        }
        if let Some(binary) = &self.binary {
            config = config.with_scanner_binary(binary);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_base(dir);
        }
        if let Some(secs) = self.cooldown {
            config = config.with_phase_cooldown(Duration::from_secs(secs));
        }
        if self.webhook.is_some() {
            config = config.with_webhook_url(self.webhook.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(input) = cli.target_input() else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::from(EXIT_USAGE);
    };

    init_tracing();

    if cli.url.is_some() && cli.list.is_some() {
        tracing::warn!("Both --url and --list given, scanning the single URL only");
    }

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "[!] Fatal setup error:".red().bold(), e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    if which::which(&config.scanner_binary).is_err() {
        tracing::warn!(
            binary = %config.scanner_binary.display(),
            "Scanner binary not found, every phase will fail"
        );
    }

    match ScanRun::new(config).execute(Some(input)).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match &e {
                OrchestratorError::ReportWrite { .. } => eprintln!(
                    "{} {} (scans ran, but no report was produced)",
                    "[!] Fatal report error:".red().bold(),
                    e
                ),
                OrchestratorError::NoTargets => {
                    let _ = Cli::command().print_help();
                }
                _ => eprintln!("{} {}", "[!] Fatal setup error:".red().bold(), e),
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Completed runs exit 0 even when phases failed; only missing input and
/// fatal errors change the code.
fn exit_code(err: &OrchestratorError) -> u8 {
    match err {
        OrchestratorError::NoTargets => EXIT_USAGE,
        _ => EXIT_FATAL,
    }
}

async fn load_config(cli: &Cli) -> Result<OrchestratorConfig> {
    let mut config = base_config();
    if let Some(path) = &cli.config {
        config = FileConfig::load(path).await?.apply(config);
    }
    Ok(cli.apply(config))
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📌 Targets saved in: {}", summary.targets_path.display());
    println!("📁 Output saved in: {}", summary.output_dir.display());
    println!();
    for outcome in &summary.report.outcomes {
        let mark = if outcome.is_success() {
            "✓".green()
        } else {
            "✗".red()
        };
        match &outcome.error {
            None => println!("  {} {}", mark, outcome.label),
            Some(error) => println!("  {} {} ({})", mark, outcome.label, error),
        }
    }
    println!();
    println!(
        "🎯 Scan completed: {} succeeded, {} failed. Report: {}",
        summary.report.succeeded(),
        summary.report.failed(),
        summary.report.report_path.display()
    );
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phasescan=info,orchestrator=info".into()),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_target_flags() {
        let cli = Cli::try_parse_from(["phasescan"]).unwrap();
        assert!(cli.target_input().is_none());
    }

    #[test]
    fn test_url_and_list() {
        let cli = Cli::try_parse_from(["phasescan", "-u", "http://example.test"]).unwrap();
        assert_eq!(
            cli.target_input(),
            Some(TargetInput::Single("http://example.test".to_string()))
        );

        let cli = Cli::try_parse_from(["phasescan", "--list", "urls.txt"]).unwrap();
        assert_eq!(
            cli.target_input(),
            Some(TargetInput::List(PathBuf::from("urls.txt")))
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&OrchestratorError::NoTargets), EXIT_USAGE);
        assert_eq!(exit_code(&OrchestratorError::EmptyTarget), EXIT_FATAL);
        assert_eq!(
            exit_code(&OrchestratorError::TargetListNotFound(PathBuf::from("urls.txt"))),
            EXIT_FATAL
        );
        let report = OrchestratorError::report_write(
            "out/report.html",
            std::io::Error::new(std::io::ErrorKind::IsADirectory, "is a directory"),
        );
        assert_eq!(exit_code(&report), EXIT_FATAL);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "phasescan",
            "-u",
            "x",
            "--templates",
            "/opt/t",
            "--binary",
            "/bin/nuclei",
            "--output-dir",
            "/scans",
            "--cooldown",
            "0",
            "--webhook",
            "https://hooks.example.test/1",
        ])
        .unwrap();

        let config = cli.apply(OrchestratorConfig::default());
        assert_eq!(config.templates_dir, PathBuf::from("/opt/t"));
        assert_eq!(config.scanner_binary, PathBuf::from("/bin/nuclei"));
        assert_eq!(config.output_base, PathBuf::from("/scans"));
        assert_eq!(config.phase_cooldown, Duration::ZERO);
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://hooks.example.test/1")
        );
    }
}
