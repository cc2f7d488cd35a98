//! Aggregates over one practice session's graded items.

use crate::model::{Category, Grade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionItem {
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub answered: bool,
    #[serde(default)]
    pub overall_score: Option<u8>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub count: usize,
    pub avg_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub score_sum: u64,
    pub avg_score: Option<u8>,
    pub grade: Option<Grade>,
    pub duration_ms: u64,
    pub by_category: BTreeMap<Category, CategorySummary>,
}

fn rounded_mean(sum: u64, n: u64) -> Option<u8> {
    if n == 0 {
        return None;
    }
    let mean = (sum as f64 / n as f64).round();
    Some(mean.clamp(0.0, 100.0) as u8)
}

pub fn summarize(items: &[SessionItem]) -> SessionSummary {
    let mut score_sum = 0u64;
    let mut scored = 0u64;
    let mut per_category: BTreeMap<Category, (usize, u64, u64)> = BTreeMap::new();

    for item in items {
        let entry = per_category.entry(item.category).or_default();
        entry.0 += 1;
        if let Some(score) = item.overall_score {
            score_sum += u64::from(score);
            scored += 1;
            entry.1 += u64::from(score);
            entry.2 += 1;
        }
    }

    let avg_score = rounded_mean(score_sum, scored);
    SessionSummary {
        total: items.len(),
        answered: items.iter().filter(|i| i.answered).count(),
        score_sum,
        avg_score,
        grade: avg_score.map(Grade::from_score),
        duration_ms: items.iter().map(|i| i.duration_ms).sum(),
        by_category: per_category
            .into_iter()
            .map(|(category, (count, sum, n))| {
                (
                    category,
                    CategorySummary {
                        count,
                        avg_score: rounded_mean(sum, n),
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: Category, score: Option<u8>, duration_ms: u64) -> SessionItem {
        SessionItem {
            category,
            answered: score.is_some(),
            overall_score: score,
            duration_ms,
        }
    }

    #[test]
    fn empty_session_has_no_average() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.avg_score, None);
        assert_eq!(s.grade, None);
        assert!(s.by_category.is_empty());
    }

    #[test]
    fn averages_only_scored_items() {
        let s = summarize(&[
            item(Category::Tech, Some(81), 60_000),
            item(Category::Tech, Some(76), 45_000),
            item(Category::Behavior, None, 5_000),
            item(Category::Behavior, Some(90), 30_000),
        ]);
        assert_eq!(s.total, 4);
        assert_eq!(s.answered, 3);
        assert_eq!(s.score_sum, 247);
        // 247 / 3 = 82.33
        assert_eq!(s.avg_score, Some(82));
        assert_eq!(s.grade, Some(Grade::A));
        assert_eq!(s.duration_ms, 140_000);
        assert_eq!(
            s.by_category[&Category::Tech],
            CategorySummary { count: 2, avg_score: Some(79) }
        );
        assert_eq!(
            s.by_category[&Category::Behavior],
            CategorySummary { count: 2, avg_score: Some(90) }
        );
    }

    #[test]
    fn summary_serializes_camel_case_with_ordered_categories() {
        let s = summarize(&[
            item(Category::General, Some(50), 1),
            item(Category::Behavior, Some(70), 1),
        ]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["scoreSum"], 120);
        assert_eq!(v["avgScore"], 60);
        assert_eq!(v["grade"], "C");
        let keys: Vec<_> = v["byCategory"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["behavior".to_string(), "general".to_string()]);
    }
}
