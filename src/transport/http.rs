use super::{CompletionError, CompletionProvider};
use crate::config::CompletionConfig;
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Chat completion client for OpenAI-compatible endpoints (OpenAI, LiteLLM,
/// vLLM, Ollama's `/v1`, ...).
pub struct HttpCompletionProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f64>,
}

impl HttpCompletionProvider {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("PROMPTCALL_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )))
            .build()
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, messages: &[Message]) -> serde_json::Value {
        let wire: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();
        let mut body = json!({
            "model": self.model,
            "messages": wire,
        });
        if let Some(t) = self.temperature {
            body["temperature"] = json!(t);
        }
        body
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(&self, messages: &[Message]) -> std::result::Result<String, CompletionError> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(messages));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, model = %self.model, messages = messages.len(), "requesting completion");
        let response = req
            .send()
            .await
            .map_err(|e| CompletionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        payload
            .pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| CompletionError::Malformed("no text content in first choice".into()))
    }
}
