use crate::category;
use crate::errors::GradeFailure;
use crate::feedback;
use crate::model::{Evaluation, GradeOutcome, GradeStatus};

/// Longest raw upstream excerpt written to the diagnostic log.
pub const RAW_EXCERPT_CHARS: usize = 2000;

/// Converts any stage failure into the safe default outcome.
pub fn recover(failure: &GradeFailure, question: &str) -> GradeOutcome {
    let kind = failure.kind();
    match failure {
        GradeFailure::Malformed(e) => tracing::warn!(
            code = kind.as_str(),
            reason = %e.reason,
            raw = %e.raw_excerpt(RAW_EXCERPT_CHARS),
            "grading fell back to default evaluation"
        ),
        GradeFailure::Transport(e) => tracing::warn!(
            code = kind.as_str(),
            status = ?e.status,
            detail = %e.detail,
            "grading fell back to default evaluation"
        ),
        GradeFailure::Invariant(e) => tracing::warn!(
            code = kind.as_str(),
            field = e.field,
            detail = %e.detail,
            "grading fell back to default evaluation"
        ),
    }

    GradeOutcome {
        data: Evaluation::fallback(category::classify_question(question)),
        feedback_text: feedback::fallback_message(kind).to_string(),
        status: GradeStatus::Fallback(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FailureKind, MalformedOutputError, TransportError};
    use crate::model::{Category, Grade};

    #[test]
    fn fallback_uses_classified_category() {
        let failure: GradeFailure = TransportError::rate_limited("429").into();
        let outcome = recover(&failure, "Walk me through a production outage you handled");
        assert_eq!(outcome.data.overall_score, 0);
        assert_eq!(outcome.data.grade, Grade::F);
        assert_eq!(outcome.data.category, Category::Incident);
        assert_eq!(
            outcome.status,
            GradeStatus::Fallback(FailureKind::TransportRateLimited)
        );
        assert!(!outcome.feedback_text.is_empty());
    }

    #[test]
    fn malformed_and_transport_messages_differ() {
        let a = recover(&TransportError::timeout("slow").into(), "Q");
        let b = recover(&MalformedOutputError::new("no JSON", "hello").into(), "Q");
        assert_ne!(a.feedback_text, b.feedback_text);
        a.data.check_invariants().unwrap();
        b.data.check_invariants().unwrap();
    }
}
