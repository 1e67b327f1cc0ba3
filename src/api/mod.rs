pub mod lmstudio;
pub mod logging;
pub mod mock;
pub mod router;

use crate::types::ChatTurn;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// The backends a prompt can be routed to. Closed set; adding a provider
/// means adding a variant here and a client in [`router`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiProvider {
    Claude,
    LmStudio,
    Ollama,
    OpenAi,
}

impl ApiProvider {
    /// Stable presentation order for listings.
    pub const ALL: [ApiProvider; 4] = [
        ApiProvider::Claude,
        ApiProvider::LmStudio,
        ApiProvider::Ollama,
        ApiProvider::OpenAi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiProvider::Claude => "claude",
            ApiProvider::LmStudio => "lmstudio",
            ApiProvider::Ollama => "ollama",
            ApiProvider::OpenAi => "openai",
        }
    }

    /// Case-insensitive lookup for user-supplied provider names.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == normalized)
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform send-prompt contract every backend implements.
///
/// `context` carries prior conversation turns; backends that cannot build
/// multi-turn requests ignore it. Model management is an optional
/// capability: the default is the explicit "not supported" marker and only
/// providers with model introspection override it.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn send(&self, prompt: &str, context: &[ChatTurn]) -> Result<String>;

    fn model_manager(&self) -> Option<&dyn ModelManager> {
        None
    }
}

#[async_trait]
pub trait ModelManager: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>>;
    fn set_current_model(&self, id: &str);
    fn get_current_model(&self) -> String;
}
