use crate::api::ApiProvider;
use crate::util::{is_local_endpoint_url, parse_bool_flag};
use anyhow::{anyhow, bail, Result};

const DEFAULT_MODEL: &str = "llama-3.2-3b-instruct";
const DEFAULT_LMSTUDIO_API_URL: &str = "http://localhost:1234/v1";
const DEFAULT_MOCK_LATENCY_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    /// Provider selected at startup.
    pub provider: ApiProvider,
    /// Model selected at startup (LM Studio model id).
    pub model: String,
    /// Base URL of the OpenAI-compatible LM Studio server.
    pub lmstudio_api_url: String,
    pub lmstudio_api_key: Option<String>,
    /// Whether prior conversation turns are sent with each LM Studio request.
    pub send_context: bool,
    /// Simulated latency of the stub providers.
    pub mock_latency_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let provider = match std::env::var("PARLEY_PROVIDER") {
            Ok(value) => ApiProvider::parse(&value).ok_or_else(|| {
                anyhow!(
                    "Invalid PARLEY_PROVIDER '{}': expected one of {}",
                    value,
                    ApiProvider::ALL.map(|p| p.as_str()).join(", ")
                )
            })?,
            Err(_) => ApiProvider::LmStudio,
        };
        let model = std::env::var("PARLEY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let lmstudio_api_url = std::env::var("LMSTUDIO_API_URL")
            .unwrap_or_else(|_| DEFAULT_LMSTUDIO_API_URL.to_string());
        let lmstudio_api_key = std::env::var("LMSTUDIO_API_KEY").ok().and_then(|v| {
            if v.trim().is_empty() {
                None
            } else {
                Some(v)
            }
        });
        let send_context = std::env::var("PARLEY_SEND_CONTEXT")
            .ok()
            .and_then(|v| parse_bool_flag(&v))
            .unwrap_or(true);
        let mock_latency_ms = std::env::var("PARLEY_MOCK_LATENCY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MOCK_LATENCY_MS);

        Ok(Self {
            provider,
            model,
            lmstudio_api_url,
            lmstudio_api_key,
            send_context,
            mock_latency_ms,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lmstudio_api_url.starts_with("http://")
            && !self.lmstudio_api_url.starts_with("https://")
        {
            bail!(
                "Invalid LMSTUDIO_API_URL '{}': expected http:// or https:// URL",
                self.lmstudio_api_url
            );
        }

        if !self.is_local_endpoint() && self.lmstudio_api_key.is_none() {
            bail!(
                "LMSTUDIO_API_KEY must be set for non-local endpoints (url: '{}')",
                self.lmstudio_api_url
            );
        }

        if self.model.trim().is_empty() {
            bail!("PARLEY_MODEL must not be empty");
        }

        Ok(())
    }

    fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.lmstudio_api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            provider: ApiProvider::LmStudio,
            model: DEFAULT_MODEL.to_string(),
            lmstudio_api_url: DEFAULT_LMSTUDIO_API_URL.to_string(),
            lmstudio_api_key: None,
            send_context: true,
            mock_latency_ms: 0,
        }
    }

    #[test]
    fn test_validate_allows_local_endpoint_without_api_key() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_api_key_for_remote_endpoint() {
        let mut config = base_config();
        config.lmstudio_api_url = "https://lmstudio.example.com/v1".to_string();
        assert!(config.validate().is_err());

        config.lmstudio_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = base_config();
        config.lmstudio_api_url = "ftp://localhost:1234/v1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_model() {
        let mut config = base_config();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reads_environment() {
        let _env_lock = crate::test_support::env_lock();
        std::env::set_var("PARLEY_PROVIDER", "CLAUDE");
        std::env::set_var("PARLEY_MODEL", "qwen2.5-7b");
        std::env::set_var("PARLEY_SEND_CONTEXT", "off");
        std::env::set_var("PARLEY_MOCK_LATENCY_MS", "0");

        let config = Config::load().unwrap();
        assert_eq!(config.provider, ApiProvider::Claude);
        assert_eq!(config.model, "qwen2.5-7b");
        assert!(!config.send_context);
        assert_eq!(config.mock_latency_ms, 0);

        std::env::remove_var("PARLEY_PROVIDER");
        std::env::remove_var("PARLEY_MODEL");
        std::env::remove_var("PARLEY_SEND_CONTEXT");
        std::env::remove_var("PARLEY_MOCK_LATENCY_MS");
    }

    #[test]
    fn test_load_rejects_unknown_provider() {
        let _env_lock = crate::test_support::env_lock();
        std::env::set_var("PARLEY_PROVIDER", "geminibot");
        assert!(Config::load().is_err());
        std::env::remove_var("PARLEY_PROVIDER");
    }
}
