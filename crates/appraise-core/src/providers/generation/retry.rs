use super::{GenerationClient, RawGenerationOutput};
use crate::errors::TransportError;
use crate::model::ScoreScale;
use crate::prompt::GenerationPrompt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first; zero disables retrying.
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Retries transient transport failures (timeouts and rate limits) with linear backoff.
pub struct RetryingClient {
    inner: Arc<dyn GenerationClient>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: Arc<dyn GenerationClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl GenerationClient for RetryingClient {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        scale: ScoreScale,
    ) -> Result<RawGenerationOutput, TransportError> {
        let mut attempt: u32 = 0;
        loop {
            match self.inner.generate(prompt, scale).await {
                Ok(out) => return Ok(out),
                Err(e) if e.kind.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let wait = self.policy.backoff * attempt;
                    tracing::warn!(
                        provider = self.inner.provider_name(),
                        kind = %e.kind,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "transient generation failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
