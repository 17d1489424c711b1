use anyhow::{Context, Result};
use orchestrator::OrchestratorConfig;
use phasescan_core::PhaseDefinition;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TEMPLATES_DIR: &str = "nuclei-templates";

/// Optional TOML settings. Every field overrides the built-in default when
/// present; CLI flags are applied on top afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub scanner_binary: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub cooldown_secs: Option<u64>,
    pub retries: Option<u32>,
    pub webhook_url: Option<String>,
    pub notify_timeout_secs: Option<u64>,
    pub phases: Option<Vec<PhaseDefinition>>,
}

impl FileConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn apply(self, mut config: OrchestratorConfig) -> OrchestratorConfig {
        if let Some(binary) = self.scanner_binary {
            config = config.with_scanner_binary(binary);
        }
        if let Some(dir) = self.templates_dir {
            config = config.with_templates_dir(dir);
        }
        if let Some(dir) = self.output_dir {
            config = config.with_output_base(dir);
        }
        if let Some(secs) = self.cooldown_secs {
            config = config.with_phase_cooldown(Duration::from_secs(secs));
        }
        if let Some(retries) = self.retries {
            config = config.with_retries(retries);
        }
        if self.webhook_url.is_some() {
            config = config.with_webhook_url(self.webhook_url);
        }
        if let Some(secs) = self.notify_timeout_secs {
            config = config.with_notify_timeout(Duration::from_secs(secs));
        }
        if let Some(phases) = self.phases {
            config = config.with_phases(phases);
        }
        config
    }
}

/// Built-in defaults, with the template checkout expected under the home
/// directory.
pub fn base_config() -> OrchestratorConfig {
    let templates = dirs::home_dir()
        .map(|home| home.join(TEMPLATES_DIR))
        .unwrap_or_else(|| PathBuf::from(TEMPLATES_DIR));
    OrchestratorConfig::new(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_keeps_defaults() {
        let file: FileConfig = toml::from_str("").unwrap();
        let config = file.apply(OrchestratorConfig::new("/t"));
        assert_eq!(config.templates_dir, PathBuf::from("/t"));
        assert_eq!(config.phase_cooldown, Duration::from_secs(30));
        assert_eq!(config.phases.len(), 3);
    }

    #[test]
    fn test_file_overrides() {
        let file: FileConfig = toml::from_str(
            r#"
            scanner_binary = "/usr/local/bin/nuclei"
            templates_dir = "/srv/templates"
            output_dir = "/var/scans"
            cooldown_secs = 5
            retries = 2
            webhook_url = "https://hooks.example.test/abc"

            [[phases]]
            name = "takeovers"
            tags = ["takeover"]
            rate_limit = 20

            [[phases]]
            name = "critical"
            severities = ["critical"]
            output = "crit.txt"
            "#,
        )
        .unwrap();

        let config = file.apply(OrchestratorConfig::default());
        assert_eq!(config.scanner_binary, PathBuf::from("/usr/local/bin/nuclei"));
        assert_eq!(config.templates_dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.output_base, PathBuf::from("/var/scans"));
        assert_eq!(config.phase_cooldown, Duration::from_secs(5));
        assert_eq!(config.retries, 2);
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://hooks.example.test/abc")
        );
        assert_eq!(config.phases.len(), 2);
        assert_eq!(config.phases[0].rate_limit().get(), 20);
        assert_eq!(config.phases[1].output_file(), PathBuf::from("crit.txt"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<FileConfig>("cooldown = 3").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileConfig::load(&dir.path().join("nope.toml")).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phasescan.toml");
        std::fs::write(&path, "cooldown_secs = 0\n").unwrap();

        let config = FileConfig::load(&path).await.unwrap().apply(base_config());
        assert_eq!(config.phase_cooldown, Duration::ZERO);
        assert!(config.templates_dir.ends_with(TEMPLATES_DIR));
    }
}
