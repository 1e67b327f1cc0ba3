use super::lmstudio::LmStudioClient;
use super::mock::MockProviderClient;
use super::{ApiProvider, ModelManager, ProviderClient};
use crate::config::Config;
use crate::state::SessionHandle;
use crate::types::ChatTurn;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Routes every prompt to the currently preferred provider.
///
/// A flat selector: any provider may be chosen at any time, the selection is
/// read from the session on every send, and a failing provider is never
/// retried or swapped for another.
#[derive(Clone)]
pub struct ProviderRouter {
    session: SessionHandle,
    claude: Arc<MockProviderClient>,
    lmstudio: Arc<LmStudioClient>,
    ollama: Arc<MockProviderClient>,
    openai: Arc<MockProviderClient>,
}

impl ProviderRouter {
    pub fn new(config: &Config, session: SessionHandle) -> Self {
        let latency = Duration::from_millis(config.mock_latency_ms);
        Self {
            session,
            claude: Arc::new(MockProviderClient::new("Claude", latency)),
            lmstudio: Arc::new(LmStudioClient::new(config)),
            ollama: Arc::new(MockProviderClient::new("Ollama", latency)),
            openai: Arc::new(MockProviderClient::new("OpenAI", latency)),
        }
    }

    pub fn available_providers(&self) -> [ApiProvider; 4] {
        ApiProvider::ALL
    }

    pub fn preferred_provider(&self) -> ApiProvider {
        self.session.preferred_provider()
    }

    pub fn set_preferred_provider(&self, provider: ApiProvider) {
        self.session.set_preferred_provider(provider);
    }

    /// Send a prompt to the currently preferred provider and return its
    /// textual response. Failures surface to the caller untouched.
    pub async fn send_prompt(&self, prompt: &str, context: &[ChatTurn]) -> Result<String> {
        self.client_for(self.preferred_provider())
            .send(prompt, context)
            .await
    }

    /// The model-management capability of `provider`, or `None` for
    /// providers without model introspection. Callers must branch on the
    /// `None` marker instead of assuming support.
    pub fn model_manager_for(&self, provider: ApiProvider) -> Option<&dyn ModelManager> {
        self.client_for(provider).model_manager()
    }

    fn client_for(&self, provider: ApiProvider) -> &dyn ProviderClient {
        match provider {
            ApiProvider::Claude => self.claude.as_ref(),
            ApiProvider::LmStudio => self.lmstudio.as_ref(),
            ApiProvider::Ollama => self.ollama.as_ref(),
            ApiProvider::OpenAi => self.openai.as_ref(),
        }
    }
}
