use super::{GenerationClient, RawGenerationOutput};
use crate::errors::{TransportError, TransportErrorKind};
use crate::model::ScoreScale;
use crate::prompt::GenerationPrompt;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const PROVIDER: &str = "openai";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    /// Maximum output size requested from the service.
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.35,
            max_tokens: 2000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat Completions client in JSON-object response mode.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn request_body(&self, prompt: &GenerationPrompt) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        })
    }
}

fn from_reqwest(err: reqwest::Error) -> TransportError {
    let transport = if err.is_timeout() {
        TransportError::new(TransportErrorKind::Timeout, err.to_string())
    } else {
        TransportError::classify(err.status().map(|s| s.as_u16()), err.to_string())
    };
    transport.with_provider(PROVIDER)
}

/// Message content of the first choice; absent content is an empty payload.
pub(crate) fn completion_text(body: &serde_json::Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        scale: ScoreScale,
    ) -> Result<RawGenerationOutput, TransportError> {
        let url = self.endpoint();
        crate::providers::network::check_outbound(&url)
            .map_err(|e| TransportError::unknown(e.to_string()).with_provider(PROVIDER))?;

        tracing::debug!(model = %self.config.model, ?scale, "sending grading request");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(TransportError::classify(
                Some(status.as_u16()),
                format!("OpenAI chat API error (status {}): {}", status, error_text),
            )
            .with_provider(PROVIDER));
        }

        let body: serde_json::Value = resp.json().await.map_err(from_reqwest)?;
        Ok(RawGenerationOutput {
            text: completion_text(&body),
            provider: PROVIDER.to_string(),
            model: self.config.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
