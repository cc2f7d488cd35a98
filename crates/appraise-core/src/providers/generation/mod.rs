use crate::errors::TransportError;
use crate::model::ScoreScale;
use crate::prompt::GenerationPrompt;
use async_trait::async_trait;

pub mod openai;
pub mod retry;
pub mod scripted;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use retry::{RetryPolicy, RetryingClient};
pub use scripted::ScriptedClient;

/// Text returned by the generation service, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGenerationOutput {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// The only seam that performs network I/O. Implementations enforce their own
/// per-call timeout and never retry internally.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
        scale: ScoreScale,
    ) -> Result<RawGenerationOutput, TransportError>;

    fn provider_name(&self) -> &'static str;

    fn model(&self) -> &str;
}
