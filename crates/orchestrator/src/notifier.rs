//! Best-effort status messages to an external webhook.
//!
//! Delivery is at-most-once: a failed notification is logged and dropped,
//! never retried, and never affects the run.

use async_trait::async_trait;
use phasescan_core::PhaseOutcome;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OrchestratorConfig;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Used when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, message: &str) {
        debug!(message = %message, "Notifications disabled, skipping");
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("sink responded with {0}")]
    Status(reqwest::StatusCode),
}

/// Posts `{"content": "<message>"}` to a Discord-style webhook.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    /// One delivery attempt, surfacing the failure instead of swallowing it.
    pub async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&WebhookPayload { content: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status));
        }
        Ok(())
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // webhook URLs embed their secret token
        f.debug_struct("WebhookNotifier")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) {
        match self.deliver(message).await {
            Ok(()) => debug!(message = %message, "Notification delivered"),
            Err(e) => warn!(error = %e, "Notification failed"),
        }
    }
}

/// Webhook notifier when a URL is configured, otherwise a no-op.
pub fn notifier_from_config(config: &OrchestratorConfig) -> Arc<dyn Notifier> {
    match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone(), config.notify_timeout)),
        None => Arc::new(NullNotifier),
    }
}

/// Message texts sent over the course of a run.
pub mod messages {
    use super::*;

    pub fn run_started() -> String {
        "🚀 NucleiAutomator scan started!".to_string()
    }

    pub fn phase_finished(outcome: &PhaseOutcome, artifact: &Path) -> String {
        if outcome.is_success() {
            format!(
                "✅ Nuclei phase `{}` completed. Check: `{}`",
                outcome.label,
                artifact.display()
            )
        } else {
            format!("❌ Nuclei scan failed in phase `{}`", outcome.label)
        }
    }

    pub fn report_ready() -> String {
        "📝 Nuclei report is ready (HTML generated)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_webhook_posts_content_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(json!({ "content": "scan started" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(format!("{}/hook", server.uri()), Duration::from_secs(5));
        notifier.deliver("scan started").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_2xx_is_swallowed_and_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), Duration::from_secs(5));
        let err = notifier.deliver("x").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Status(s) if s.as_u16() == 500));

        // swallowed on the trait path
        let server2 = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server2)
            .await;
        WebhookNotifier::new(server2.uri(), Duration::from_secs(5))
            .notify("phase failed")
            .await;
    }

    #[tokio::test]
    async fn test_timeout_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(server.uri(), Duration::from_millis(100));
        assert!(notifier.deliver("slow").await.is_err());
        notifier.notify("slow").await;
    }

    #[tokio::test]
    async fn test_unreachable_sink_is_swallowed() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook", Duration::from_secs(1));
        notifier.notify("nobody listening").await;
    }

    #[test]
    fn test_debug_hides_url() {
        let notifier = WebhookNotifier::new("https://hooks.example.test/secret-token", Duration::from_secs(1));
        assert!(!format!("{:?}", notifier).contains("secret-token"));
    }

    #[test]
    fn test_phase_messages() {
        let ok = PhaseOutcome::succeeded("info", None);
        let msg = messages::phase_finished(&ok, Path::new("out/info.txt"));
        assert_eq!(msg, "✅ Nuclei phase `info` completed. Check: `out/info.txt`");

        let failed = PhaseOutcome::failed("low", "boom");
        let msg = messages::phase_finished(&failed, Path::new("out/low.txt"));
        assert_eq!(msg, "❌ Nuclei scan failed in phase `low`");
    }
}
