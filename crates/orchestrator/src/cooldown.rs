use async_trait::async_trait;
use std::time::Duration;

/// Suspends the orchestration between phases.
#[async_trait]
pub trait Cooldown: Send + Sync {
    async fn pause(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCooldown;

#[async_trait]
impl Cooldown for TokioCooldown {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cooldown_waits_full_duration() {
        let start = tokio::time::Instant::now();
        TokioCooldown.pause(Duration::from_secs(30)).await;
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
