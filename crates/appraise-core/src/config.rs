use crate::errors::ConfigError;
use crate::model::ScoreScale;
use crate::pipeline::PipelineOptions;
use crate::providers::generation::openai::{OpenAiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::providers::generation::RetryPolicy;
use crate::score::ScorePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Fake,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Fake => "fake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff_ms: default_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradingConfig {
    pub version: u32,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub scale: ScoreScale,
    #[serde(default = "default_true")]
    pub leniency: bool,
    #[serde(default = "default_language")]
    pub feedback_language: String,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Reply returned by the `fake` provider.
    #[serde(default)]
    pub fake_reply: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_temperature() -> f32 {
    0.35
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_language() -> String {
    "English".to_string()
}
fn default_backoff_ms() -> u64 {
    500
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            provider: ProviderKind::default(),
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            scale: ScoreScale::default(),
            leniency: true,
            feedback_language: default_language(),
            retry: RetryConfig::default(),
            fake_reply: None,
        }
    }
}

impl GradingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError("max_tokens must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError("timeout_secs must be positive".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError("model must not be empty".into()));
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            scale: self.scale,
            policy: ScorePolicy {
                leniency: self.leniency,
            },
            language: self.feedback_language.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            backoff: Duration::from_millis(self.retry.backoff_ms),
        }
    }

    /// The key is passed in; the core never reads it from the environment.
    pub fn openai_config(&self, api_key: impl Into<String>) -> OpenAiConfig {
        OpenAiConfig {
            api_base: self.api_base.clone(),
            api_key: api_key.into(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn load_config(path: &Path) -> Result<GradingConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    let cfg: GradingConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, include_str!("../../../appraise.yaml"))
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}
