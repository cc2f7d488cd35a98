//! Human-readable rendering of an Evaluation.

use crate::errors::FailureKind;
use crate::model::{Axis, Evaluation};
use std::fmt::Write;

fn score_line(eval: &Evaluation) -> String {
    let breakdown = Axis::ALL
        .iter()
        .map(|axis| format!("{} {}", axis.key(), eval.sub_scores.get(*axis)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Overall score: {}/100 (grade {}) | {}",
        eval.overall_score, eval.grade, breakdown
    )
}

fn section<I, S>(out: &mut String, title: &str, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = write!(out, "\n\n{}:", title);
    for item in items {
        let _ = write!(out, "\n- {}", item.as_ref());
    }
}

/// Fixed section order; empty sections are omitted.
pub fn compose(eval: &Evaluation) -> String {
    let mut out = score_line(eval);

    let summary = if !eval.summary_interviewer.is_empty() {
        &eval.summary_interviewer
    } else {
        &eval.summary_coach
    };
    if !summary.is_empty() {
        let _ = write!(out, "\n\n{}", summary);
    }
    if !eval.keywords.is_empty() {
        let _ = write!(out, "\n\nKeywords: {}", eval.keywords.join(", "));
    }

    section(&mut out, "Strengths", &eval.strengths);
    section(&mut out, "Gaps", &eval.gaps);
    section(
        &mut out,
        "Pitfalls",
        eval.pitfalls.iter().map(|p| match p.level {
            Some(level) => format!("(level {}) {}", level, p.text),
            None => p.text.clone(),
        }),
    );
    section(&mut out, "Next steps", &eval.next);
    section(
        &mut out,
        "Follow-up questions",
        eval.follow_up_questions.iter().map(|f| f.question.as_str()),
    );
    out
}

/// Operator-facing explanation attached to a fallback result.
pub fn fallback_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::TransportRateLimited => {
            "Grading is temporarily unavailable: the evaluation service is rate limited. Please try again shortly."
        }
        FailureKind::TransportTimeout => {
            "Grading failed: the evaluation service did not respond in time. Please try again."
        }
        FailureKind::TransportUnknown => {
            "Grading failed: the evaluation service could not be reached. Please try again later."
        }
        FailureKind::MalformedOutput => {
            "Grading failed: the evaluation service returned an unreadable result. Please try again."
        }
        FailureKind::InvariantViolation => {
            "Grading failed: the evaluation could not be validated. Please try again."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AxisScores, Category, FollowUp, Grade, Pitfall};

    fn sample() -> Evaluation {
        let mut eval = Evaluation::fallback(Category::Tech);
        eval.sub_scores = AxisScores {
            structure: 8,
            specificity: 7,
            logic: 9,
            tech_depth: 6,
            risk: 5,
        };
        eval.overall_score = 72;
        eval.grade = Grade::B;
        eval.summary_coach = "Add numbers.".into();
        eval.keywords = vec!["latency".into(), "cache".into()];
        eval.strengths = vec!["clear structure".into()];
        eval.pitfalls = vec![
            Pitfall { text: "vague impact".into(), level: Some(2) },
            Pitfall { text: "no tradeoffs".into(), level: None },
        ];
        eval.follow_up_questions = vec![FollowUp {
            question: "Why Redis?".into(),
            reason: "depth".into(),
        }];
        eval
    }

    #[test]
    fn renders_sections_in_fixed_order() {
        let text = compose(&sample());
        assert_eq!(
            text,
            "Overall score: 72/100 (grade B) | structure 8, specificity 7, logic 9, tech_depth 6, risk 5\n\n\
             Add numbers.\n\n\
             Keywords: latency, cache\n\n\
             Strengths:\n- clear structure\n\n\
             Pitfalls:\n- (level 2) vague impact\n- no tradeoffs\n\n\
             Follow-up questions:\n- Why Redis?"
        );
    }

    #[test]
    fn interviewer_summary_wins_over_coach() {
        let mut eval = sample();
        eval.summary_interviewer = "Strong hire signal.".into();
        let text = compose(&eval);
        assert!(text.contains("Strong hire signal."));
        assert!(!text.contains("Add numbers."));
    }

    #[test]
    fn empty_evaluation_is_just_the_score_line() {
        let text = compose(&Evaluation::fallback(Category::General));
        assert_eq!(
            text,
            "Overall score: 0/100 (grade F) | structure 0, specificity 0, logic 0, tech_depth 0, risk 0"
        );
    }

    #[test]
    fn fallback_messages_distinguish_rate_limit_from_malformed() {
        let rate = fallback_message(FailureKind::TransportRateLimited);
        let malformed = fallback_message(FailureKind::MalformedOutput);
        assert!(rate.contains("rate limited"));
        assert!(malformed.contains("unreadable"));
        assert_ne!(rate, fallback_message(FailureKind::TransportUnknown));
    }
}
