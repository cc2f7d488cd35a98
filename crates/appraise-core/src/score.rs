//! Overall score, grade and chart derivation from normalized sub-scores.
//!
//! The derived overall score always wins over any overall score the upstream
//! supplied, so a stored record can never contradict its own sub-scores.

use crate::model::{AxisScores, Grade, OVERALL_MAX, SUB_SCORE_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePolicy {
    /// Lift low sub-scores before averaging (raw grading skews harsh for early-career candidates).
    pub leniency: bool,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self { leniency: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub overall_score: u8,
    pub grade: Grade,
    pub chart: AxisScores,
}

/// <=3 gains 2, 4-5 gains 1, >=6 unchanged.
pub fn lenient(score: u8) -> u8 {
    let lifted = match score {
        0..=3 => score + 2,
        4..=5 => score + 1,
        _ => score,
    };
    lifted.min(SUB_SCORE_MAX)
}

pub fn overall_score(sub_scores: &AxisScores, policy: ScorePolicy) -> u8 {
    let values = sub_scores.values();
    let sum: f64 = values
        .iter()
        .map(|&v| {
            if policy.leniency {
                f64::from(lenient(v))
            } else {
                f64::from(v)
            }
        })
        .sum();
    let avg = sum / values.len() as f64;
    (avg * 10.0).round().clamp(0.0, f64::from(OVERALL_MAX)) as u8
}

/// Chart is the untransformed sub-score on the 0-100 scale.
pub fn chart(sub_scores: &AxisScores) -> AxisScores {
    sub_scores.map(|v| v.min(SUB_SCORE_MAX) * 10)
}

pub fn aggregate(sub_scores: &AxisScores, policy: ScorePolicy) -> Aggregate {
    let overall_score = overall_score(sub_scores, policy);
    Aggregate {
        overall_score,
        grade: Grade::from_score(overall_score),
        chart: chart(sub_scores),
    }
}
