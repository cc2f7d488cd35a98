//! Schema firewall: turns any parsed upstream value into a complete Evaluation.
//!
//! Both the upstream snake_case vocabulary (`scores`, `logic_flaws`, `polished`, ...)
//! and the Evaluation's own camelCase field names are accepted, so normalizing a
//! serialized Evaluation reproduces it exactly.

pub mod coerce;

use crate::category;
use crate::model::{limits, Axis, AxisScores, Evaluation, ScoreScale, SUB_SCORE_MAX};
use crate::score::{self, ScorePolicy};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// Scale the upstream was asked to use for `scores`.
    pub scale: ScoreScale,
    pub policy: ScorePolicy,
}

/// A value above this cannot be a slightly overshooting 0-10 score.
const PERCENT_EVIDENCE: f64 = 20.0;

/// True when unrequested 0-100 values are unambiguous: every present value is
/// above 10, or one is above [`PERCENT_EVIDENCE`]. Anything milder is clamped.
fn looks_like_percent(present: &[f64]) -> bool {
    let ten = f64::from(SUB_SCORE_MAX);
    !present.is_empty()
        && (present.iter().all(|&v| v > ten) || present.iter().any(|&v| v > PERCENT_EVIDENCE))
}

/// Canonical `subScores` are already 0-10; upstream `scores` follow the requested scale.
fn sub_scores(obj: &Map<String, Value>, requested: ScoreScale) -> AxisScores {
    let (source, canonical) = match coerce::field(obj, &["subScores"]) {
        Some(v) => (Some(v), true),
        None => (coerce::field(obj, &["scores", "sub_scores"]), false),
    };
    let source = source.and_then(Value::as_object);

    let raw = Axis::ALL.map(|axis| {
        source.and_then(|s| {
            std::iter::once(axis.key())
                .chain(axis.aliases().iter().copied())
                .filter_map(|k| s.get(k))
                .find_map(coerce::finite_number)
        })
    });

    let present: Vec<f64> = raw.iter().flatten().copied().collect();
    let percent =
        !canonical && (requested == ScoreScale::Percent || looks_like_percent(&present));
    if percent {
        tracing::debug!(
            requested = ?requested,
            "sub-scores read on the 0-100 scale, converting to 0-10"
        );
    }

    let mut values = raw.into_iter().map(|v| {
        let v = if percent { v.map(|n| n / 10.0) } else { v };
        coerce::sub_score(v)
    });
    AxisScores::from_fn(|_| values.next().unwrap_or(coerce::DEFAULT_SUB_SCORE))
}

fn polished(obj: &Map<String, Value>) -> String {
    let text = coerce::text(coerce::field(obj, &["polishedAnswer", "polished"]));
    if text.chars().count() < limits::POLISHED_MIN_CHARS {
        String::new()
    } else {
        text
    }
}

pub fn normalize(value: &Value, question: &str, opts: &NormalizeOptions) -> Evaluation {
    let empty = Map::new();
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            tracing::debug!(kind = value_kind(value), "upstream payload is not an object");
            &empty
        }
    };
    let list = |names: &[&str], cap: usize| coerce::string_list(coerce::field(obj, names), cap);

    let sub_scores = sub_scores(obj, opts.scale);
    let agg = score::aggregate(&sub_scores, opts.policy);

    if let Some(claimed) = coerce::field(obj, &["score_overall", "overallScore"])
        .and_then(coerce::finite_number)
    {
        if claimed.round() != f64::from(agg.overall_score) {
            tracing::debug!(
                claimed,
                derived = agg.overall_score,
                "ignoring upstream overall score in favour of derived score"
            );
        }
    }

    let label = coerce::field(obj, &["category"]).and_then(Value::as_str);

    Evaluation {
        overall_score: agg.overall_score,
        sub_scores,
        grade: agg.grade,
        category: category::resolve(label, question),
        strengths: list(&["strengths"], limits::STRENGTHS),
        gaps: list(&["gaps"], limits::GAPS),
        adds: list(&["adds"], limits::ADDS),
        next: list(&["next", "next_steps"], limits::NEXT),
        keywords: list(&["keywords"], limits::KEYWORDS),
        risk_points: list(&["riskPoints", "risk_points"], limits::RISK_POINTS),
        logic_flaws: list(&["logicFlaws", "logic_flaws"], limits::LOGIC_FLAWS),
        missing_details: list(
            &["missingDetails", "missing_details"],
            limits::MISSING_DETAILS,
        ),
        pitfalls: coerce::pitfalls(coerce::field(obj, &["pitfalls"]), limits::PITFALLS),
        improvements: coerce::improvements(
            coerce::field(obj, &["improvements"]),
            limits::IMPROVEMENTS,
        ),
        follow_up_questions: coerce::follow_ups(
            coerce::field(obj, &["followUpQuestions", "follow_up_questions", "follow_up"]),
            limits::FOLLOW_UPS,
        ),
        polished_answer: polished(obj),
        summary_interviewer: coerce::text(coerce::field(
            obj,
            &["summaryInterviewer", "summary_interviewer"],
        )),
        summary_coach: coerce::text(coerce::field(obj, &["summaryCoach", "summary_coach"])),
        chart: agg.chart,
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
