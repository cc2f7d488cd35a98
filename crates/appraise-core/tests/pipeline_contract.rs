//! Output contract of the grading pipeline: `{ data, feedbackText }` under
//! success, drifted upstream output and every failure class.

use appraise_core::errors::{FailureKind, TransportError};
use appraise_core::model::{Category, Grade, GradeStatus, Pitfall, ScoreScale};
use appraise_core::pipeline::{GradingPipeline, PipelineOptions};
use appraise_core::providers::generation::{
    GenerationClient, RawGenerationOutput, RetryPolicy, RetryingClient, ScriptedClient,
};
use appraise_core::prompt::GenerationPrompt;
use appraise_core::GenerationRequest;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn request() -> GenerationRequest {
    GenerationRequest::new(
        "Tell me about a time you had a conflict with your team lead",
        "I set up a weekly sync and we agreed on review rules.",
    )
    .with_job_title("Backend Engineer")
}

fn pipeline(client: Arc<dyn GenerationClient>) -> GradingPipeline {
    GradingPipeline::new(client, PipelineOptions::default())
}

#[tokio::test]
async fn well_formed_reply_produces_contract_shape() {
    let reply = r#"Here is my evaluation:
{
  "score_overall": 99,
  "scores": {"structure": 8, "specificity": 6, "logic": 7, "tech_depth": 5, "risk": 4},
  "strengths": ["Clear ownership of the fix"],
  "gaps": ["No measurable outcome"],
  "pitfalls": ["use vague language", {"text": "no metrics", "level": 5}],
  "next": ["Quantify the result"],
  "follow_up_questions": [{"question": "How did the lead react?", "reason": "probe"}],
  "keywords": ["conflict", "communication"],
  "summary_interviewer": "Reasonable answer.",
  "category": "collaboration"
}
Hope this helps."#;
    let p = pipeline(Arc::new(ScriptedClient::repeating(reply)));
    let outcome = p.grade(&request()).await;

    assert_eq!(outcome.status, GradeStatus::Graded);
    let data = &outcome.data;
    data.check_invariants().unwrap();
    // 8, 6, 7, 5->6, 4->5 => 6.4
    assert_eq!(data.overall_score, 64);
    assert_eq!(data.grade, Grade::C);
    assert_eq!(data.category, Category::Behavior);
    assert_eq!(
        data.pitfalls,
        vec![
            Pitfall { text: "use vague language".into(), level: None },
            Pitfall { text: "no metrics".into(), level: Some(3) },
        ]
    );
    assert_eq!(data.chart.specificity, 60);

    let wire = serde_json::to_value(&outcome).unwrap();
    assert_eq!(wire["data"]["overallScore"], 64);
    assert_eq!(wire["data"]["subScores"]["tech_depth"], 5);
    assert!(wire["feedbackText"]
        .as_str()
        .unwrap()
        .contains("Pitfalls:\n- use vague language\n- (level 3) no metrics"));
}

#[tokio::test]
async fn every_failure_class_yields_a_valid_fallback() {
    let cases: Vec<(ScriptedClient, FailureKind)> = vec![
        (
            ScriptedClient::new().then_fail(TransportError::classify(Some(429), "Too Many Requests")),
            FailureKind::TransportRateLimited,
        ),
        (
            ScriptedClient::new().then_fail(TransportError::classify(None, "connection refused")),
            FailureKind::TransportUnknown,
        ),
        (
            ScriptedClient::repeating("{}")
                .with_delay(Duration::from_millis(300))
                .with_timeout(Duration::from_millis(5)),
            FailureKind::TransportTimeout,
        ),
        (ScriptedClient::repeating("   "), FailureKind::MalformedOutput),
        (
            ScriptedClient::repeating("{\"scores\": {\"structure\": 8,"),
            FailureKind::MalformedOutput,
        ),
    ];

    let mut messages = Vec::new();
    for (client, expected) in cases {
        let outcome = pipeline(Arc::new(client)).grade(&request()).await;
        assert_eq!(outcome.status, GradeStatus::Fallback(expected));
        assert_eq!(outcome.data.overall_score, 0);
        assert_eq!(outcome.data.grade, Grade::F);
        assert_eq!(outcome.data.category, Category::Behavior);
        assert!(outcome.data.strengths.is_empty());
        assert!(!outcome.feedback_text.is_empty());
        outcome.data.check_invariants().unwrap();
        messages.push(outcome.feedback_text);
    }
    assert_ne!(messages[0], messages[3], "rate limit and malformed must read differently");
}

#[tokio::test]
async fn bare_json_values_are_not_graded() {
    for reply in ["null", "42", "true", "[1,2]", "\"I cannot grade this\""] {
        let outcome = pipeline(Arc::new(ScriptedClient::repeating(reply)))
            .grade(&request())
            .await;
        assert_eq!(
            outcome.status,
            GradeStatus::Fallback(FailureKind::MalformedOutput),
            "reply {reply}"
        );
        assert_eq!(outcome.data.overall_score, 0);
        assert_eq!(outcome.data.grade, Grade::F);
    }
}

#[tokio::test]
async fn percent_scale_reply_is_stored_on_canonical_scale() {
    let reply = r#"{"scores": {"structure": 70, "specificity": 70, "logic": 70, "tech_depth": 70, "risk": 70}}"#;
    let options = PipelineOptions {
        scale: ScoreScale::Percent,
        ..PipelineOptions::default()
    };
    let p = GradingPipeline::new(Arc::new(ScriptedClient::repeating(reply)), options);
    let outcome = p.grade(&request()).await;
    assert_eq!(outcome.data.sub_scores.logic, 7);
    assert_eq!(outcome.data.chart.logic, 70);
    assert_eq!(outcome.data.overall_score, 70);
}

/// Counts in-flight calls to check the batch concurrency bound.
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl GenerationClient for Gauge {
    async fn generate(
        &self,
        _prompt: &GenerationPrompt,
        _scale: ScoreScale,
    ) -> Result<RawGenerationOutput, TransportError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(RawGenerationOutput {
            text: "{}".into(),
            provider: "gauge".into(),
            model: "gauge".into(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "gauge"
    }

    fn model(&self) -> &str {
        "gauge"
    }
}

#[tokio::test]
async fn batch_grading_respects_concurrency_bound() {
    let gauge = Arc::new(Gauge {
        current: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let p = pipeline(gauge.clone());
    let reqs: Vec<_> = (0..8).map(|_| request()).collect();
    let outcomes = p.grade_many(&reqs, 3).await;
    assert_eq!(outcomes.len(), 8);
    assert!(outcomes.iter().all(|o| !o.is_fallback()));
    let peak = gauge.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency {peak} exceeds bound");
    assert!(peak >= 2, "requests never overlapped");
}

#[tokio::test]
async fn retrying_client_composes_outside_the_pipeline() {
    let scripted = Arc::new(
        ScriptedClient::new()
            .then_fail(TransportError::rate_limited("429"))
            .then_reply(r#"{"scores": {"structure": 9, "specificity": 9, "logic": 9, "tech_depth": 9, "risk": 9}}"#),
    );
    let retrying = RetryingClient::new(
        scripted.clone(),
        RetryPolicy {
            max_retries: 1,
            backoff: Duration::from_millis(1),
        },
    );
    let outcome = pipeline(Arc::new(retrying)).grade(&request()).await;
    assert_eq!(outcome.status, GradeStatus::Graded);
    assert_eq!(outcome.data.overall_score, 90);
    assert_eq!(scripted.call_count(), 2);
}
