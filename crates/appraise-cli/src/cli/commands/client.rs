use appraise_core::config::{load_config, GradingConfig, ProviderKind};
use appraise_core::providers::generation::{
    GenerationClient, OpenAiClient, RetryingClient, ScriptedClient,
};
use appraise_core::GradingPipeline;
use std::path::Path;
use std::sync::Arc;

/// Loaded config or a printed reason it could not be used.
pub(crate) fn pipeline_from_config(path: &Path) -> Result<GradingPipeline, String> {
    let cfg = load_config(path).map_err(|e| e.to_string())?;
    let client = build_client(&cfg)?;
    Ok(GradingPipeline::new(client, cfg.pipeline_options()))
}

fn build_client(cfg: &GradingConfig) -> Result<Arc<dyn GenerationClient>, String> {
    let base: Arc<dyn GenerationClient> = match cfg.provider {
        ProviderKind::Fake => Arc::new(
            ScriptedClient::repeating(cfg.fake_reply.clone().unwrap_or_else(|| "{}".to_string()))
                .with_model(cfg.model.clone()),
        ),
        ProviderKind::OpenAi => {
            let key = std::env::var(&cfg.api_key_env).map_err(|_| {
                format!(
                    "ConfigError: environment variable {} is not set (needed for provider {})",
                    cfg.api_key_env,
                    cfg.provider.as_str()
                )
            })?;
            let client = OpenAiClient::new(cfg.openai_config(key))
                .map_err(|e| format!("failed to build HTTP client: {}", e))?;
            Arc::new(client)
        }
    };

    if cfg.retry.max_retries == 0 {
        return Ok(base);
    }
    tracing::debug!(max_retries = cfg.retry.max_retries, "retrying transient failures");
    Ok(Arc::new(RetryingClient::new(base, cfg.retry_policy())))
}
