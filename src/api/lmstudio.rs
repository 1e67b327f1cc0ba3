use super::logging::{debug_payload_enabled, emit_debug_payload, emit_request_failure};
use super::{ModelManager, ProviderClient};
use crate::config::Config;
use crate::types::ChatTurn;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Mutex;

/// Client for an LM Studio server speaking the OpenAI-compatible API.
///
/// This is the one backend that performs real asynchronous calls. It is also
/// the one provider with the model-management capability: LM Studio exposes
/// its loaded models on `GET /models`, and the currently selected model id is
/// held here and sent with every completion request.
pub struct LmStudioClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    send_context: bool,
    current_model: Mutex<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelListResponse {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl LmStudioClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.lmstudio_api_url.trim_end_matches('/').to_string(),
            api_key: config.lmstudio_api_key.clone(),
            send_context: config.send_context,
            current_model: Mutex::new(config.model.clone()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn current_model_value(&self) -> String {
        self.current_model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProviderClient for LmStudioClient {
    async fn send(&self, prompt: &str, context: &[ChatTurn]) -> Result<String> {
        let mut messages: Vec<ChatTurn> = if self.send_context {
            context.to_vec()
        } else {
            Vec::new()
        };
        messages.push(ChatTurn::user(prompt));

        let request_url = self.endpoint("chat/completions");
        let payload = json!({
            "model": self.current_model_value(),
            "messages": messages,
            "stream": false,
        });
        if debug_payload_enabled() {
            emit_debug_payload(&request_url, &payload);
        }

        let response = self
            .authorized(self.http.post(&request_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim().replace('\n', " ");
            emit_request_failure(&request_url, &detail);
            bail!("LM Studio request failed ({status}): {detail}");
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("LM Studio returned no completion choices"))
    }

    fn model_manager(&self) -> Option<&dyn ModelManager> {
        Some(self)
    }
}

#[async_trait]
impl ModelManager for LmStudioClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let request_url = self.endpoint("models");
        let response = self.authorized(self.http.get(&request_url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = body.trim().replace('\n', " ");
            emit_request_failure(&request_url, &detail);
            bail!("LM Studio model listing failed ({status}): {detail}");
        }

        let parsed: ModelListResponse = response.json().await?;
        Ok(parsed.data.into_iter().map(|entry| entry.id).collect())
    }

    fn set_current_model(&self, id: &str) {
        let mut current = self
            .current_model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = id.to_string();
    }

    fn get_current_model(&self) -> String {
        self.current_model_value()
    }
}
