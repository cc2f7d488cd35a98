//! Grading orchestrator: prompt, generate, extract, normalize, compose.
//!
//! Each stage reports failure as an explicit `Result`; the only place a
//! failure is absorbed is [`GradingPipeline::grade`], which swaps in the
//! fallback outcome. Callers always receive a valid `GradeOutcome`.

pub mod fallback;

use crate::category;
use crate::errors::GradeFailure;
use crate::extract;
use crate::feedback;
use crate::model::{Evaluation, GenerationRequest, GradeOutcome, GradeStatus, ScoreScale};
use crate::normalize::{self, NormalizeOptions};
use crate::prompt::{self, PromptOptions};
use crate::providers::generation::GenerationClient;
use crate::score::ScorePolicy;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub scale: ScoreScale,
    pub policy: ScorePolicy,
    pub language: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scale: ScoreScale::Ten,
            policy: ScorePolicy::default(),
            language: "English".to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions {
            scale: self.scale,
            language: self.language.clone(),
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            scale: self.scale,
            policy: self.policy,
        }
    }
}

pub struct GradingPipeline {
    client: Arc<dyn GenerationClient>,
    options: PipelineOptions,
}

impl GradingPipeline {
    pub fn new(client: Arc<dyn GenerationClient>, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    async fn evaluate(&self, req: &GenerationRequest) -> Result<Evaluation, GradeFailure> {
        let prompt = prompt::build_prompt(req, &self.options.prompt_options());
        tracing::debug!(
            system_chars = prompt.system.len(),
            user_chars = prompt.user.len(),
            "prompt built"
        );

        let raw = self.client.generate(&prompt, self.options.scale).await?;
        tracing::debug!(chars = raw.text.len(), "upstream replied");

        let value = extract::extract_json(&raw.text)?;
        let eval = normalize::normalize(&value, &req.question, &self.options.normalize_options());
        eval.check_invariants()?;
        Ok(eval)
    }

    /// Grade one answer. Never fails; stage errors become a fallback outcome.
    pub async fn grade(&self, req: &GenerationRequest) -> GradeOutcome {
        let span = info_span!(
            "appraise.grade",
            provider = self.client.provider_name(),
            model = %self.client.model(),
            category = %category::classify_question(&req.question)
        );
        async move {
            match self.evaluate(req).await {
                Ok(data) => {
                    tracing::info!(
                        overall_score = data.overall_score,
                        grade = %data.grade,
                        category = %data.category,
                        "answer graded"
                    );
                    let feedback_text = feedback::compose(&data);
                    GradeOutcome {
                        data,
                        feedback_text,
                        status: GradeStatus::Graded,
                    }
                }
                Err(failure) => fallback::recover(&failure, &req.question),
            }
        }
        .instrument(span)
        .await
    }

    /// Grades independent requests with at most `concurrency` in flight.
    /// Outcomes are returned in input order.
    pub async fn grade_many(
        &self,
        requests: &[GenerationRequest],
        concurrency: usize,
    ) -> Vec<GradeOutcome> {
        stream::iter(requests.iter().map(|req| self.grade(req)))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FailureKind, TransportError};
    use crate::model::{AxisScores, Category, Grade};
    use crate::providers::generation::ScriptedClient;

    fn pipeline(client: ScriptedClient) -> GradingPipeline {
        GradingPipeline::new(Arc::new(client), PipelineOptions::default())
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("How would you evolve the architecture of your cache?", "We used Redis with TTLs.")
            .with_company("Acme")
    }

    #[tokio::test]
    async fn fenced_output_with_only_overall_score_is_derived() {
        let p = pipeline(ScriptedClient::repeating("```json\n{\"score_overall\":85}\n```"));
        let outcome = p.grade(&request()).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.data.overall_score, 70);
        assert_eq!(outcome.data.sub_scores, AxisScores::uniform(7));
        assert!(outcome.feedback_text.starts_with("Overall score: 70/100 (grade B)"));
    }

    #[tokio::test]
    async fn transport_failure_falls_back() {
        let p = pipeline(ScriptedClient::new().then_fail(TransportError::timeout("deadline")));
        let outcome = p.grade(&request()).await;
        assert_eq!(outcome.status, GradeStatus::Fallback(FailureKind::TransportTimeout));
        assert_eq!(outcome.data.overall_score, 0);
        assert_eq!(outcome.data.grade, Grade::F);
        assert_eq!(outcome.data.category, Category::Architecture);
        assert!(!outcome.feedback_text.is_empty());
    }

    #[tokio::test]
    async fn prose_without_json_is_malformed() {
        let p = pipeline(ScriptedClient::repeating("I cannot grade this answer."));
        let outcome = p.grade(&request()).await;
        assert_eq!(outcome.status, GradeStatus::Fallback(FailureKind::MalformedOutput));
    }

    #[tokio::test]
    async fn requested_scale_reaches_the_client() {
        let client = Arc::new(ScriptedClient::repeating(
            r#"{"scores":{"structure":90,"specificity":90,"logic":90,"tech_depth":90,"risk":90}}"#,
        ));
        let options = PipelineOptions {
            scale: ScoreScale::Percent,
            ..PipelineOptions::default()
        };
        let p = GradingPipeline::new(client.clone(), options);
        let outcome = p.grade(&request()).await;
        assert_eq!(outcome.data.overall_score, 90);
        assert_eq!(outcome.data.grade, Grade::S);

        let (prompt, scale) = client.last_call().unwrap();
        assert_eq!(scale, ScoreScale::Percent);
        assert!(prompt.user.contains("Company: Acme"));
        assert!(prompt.user.contains("We used Redis with TTLs."));
    }

    #[tokio::test]
    async fn grade_many_preserves_input_order() {
        let client = ScriptedClient::new()
            .then_reply(r#"{"scores":{"structure":10,"specificity":10,"logic":10,"tech_depth":10,"risk":10}}"#)
            .then_fail(TransportError::rate_limited("429"))
            .then_reply("{}");
        let p = pipeline(client);
        let reqs = vec![request(), request(), request()];
        let outcomes = p.grade_many(&reqs, 1).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].data.overall_score, 100);
        assert!(outcomes[1].is_fallback());
        assert_eq!(outcomes[2].data.overall_score, 70);
    }
}
