use super::ProviderClient;
use crate::types::ChatTurn;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Stand-in backend with a fixed latency profile.
///
/// Claude, Ollama, and OpenAI are reached through this stub: it sleeps for
/// the configured latency and echoes a canned response naming the service.
/// It has no model-management capability.
pub struct MockProviderClient {
    service_name: &'static str,
    latency: Duration,
}

impl MockProviderClient {
    pub fn new(service_name: &'static str, latency: Duration) -> Self {
        Self {
            service_name,
            latency,
        }
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    async fn send(&self, prompt: &str, _context: &[ChatTurn]) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(format!(
            "Response from {} for prompt: \"{}\"",
            self.service_name, prompt
        ))
    }
}
