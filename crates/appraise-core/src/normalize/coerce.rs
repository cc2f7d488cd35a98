//! Field-level coercions. Every function here is total: bad input yields a default.

use crate::model::{FollowUp, Improvement, Pitfall, PITFALL_LEVEL_MAX, PITFALL_LEVEL_MIN};
use crate::model::SUB_SCORE_MAX;
use serde_json::{Map, Value};

/// Neutral prior for an unreadable sub-score.
pub const DEFAULT_SUB_SCORE: u8 = 7;

/// First of `names` present with a non-null value.
pub fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

/// Finite number from a JSON number or numeric string.
pub fn finite_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Round and clamp to 0..=10, or the neutral prior when absent.
pub fn sub_score(raw: Option<f64>) -> u8 {
    match raw {
        Some(n) => n.round().clamp(0.0, f64::from(SUB_SCORE_MAX)) as u8,
        None => DEFAULT_SUB_SCORE,
    }
}

/// Trimmed single line; interior line breaks fold into one space.
pub fn clean_line(s: &str) -> Option<String> {
    let folded = s
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!folded.is_empty()).then_some(folded)
}

fn trimmed(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn str_field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    obj.get(name).and_then(Value::as_str)
}

/// Plain string, or an object carrying a string `text`.
fn line_item(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => clean_line(s),
        Value::Object(obj) => str_field(obj, "text").and_then(clean_line),
        _ => None,
    }
}

pub fn string_list(v: Option<&Value>, cap: usize) -> Vec<String> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items.iter().filter_map(line_item).take(cap).collect()
}

pub fn text(v: Option<&Value>) -> String {
    v.and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn pitfall_level(v: Option<&Value>) -> Option<u8> {
    let v = v?;
    let n = match v.as_str().map(|s| s.trim().to_ascii_lowercase()) {
        Some(label) if label == "low" => 1.0,
        Some(label) if label == "medium" => 2.0,
        Some(label) if label == "high" => 3.0,
        _ => finite_number(v)?,
    };
    Some(n.round().clamp(
        f64::from(PITFALL_LEVEL_MIN),
        f64::from(PITFALL_LEVEL_MAX),
    ) as u8)
}

pub fn pitfalls(v: Option<&Value>, cap: usize) -> Vec<Pitfall> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => clean_line(s).map(|text| Pitfall { text, level: None }),
            Value::Object(obj) => {
                let text = str_field(obj, "text").and_then(clean_line)?;
                Some(Pitfall {
                    text,
                    level: pitfall_level(obj.get("level")),
                })
            }
            _ => None,
        })
        .take(cap)
        .collect()
}

/// Entries without both `before` and `after` are dropped, not defaulted.
pub fn improvements(v: Option<&Value>, cap: usize) -> Vec<Improvement> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            Some(Improvement {
                before: str_field(obj, "before").and_then(trimmed)?,
                after: str_field(obj, "after").and_then(trimmed)?,
                reason: text(obj.get("reason")),
            })
        })
        .take(cap)
        .collect()
}

pub fn follow_ups(v: Option<&Value>, cap: usize) -> Vec<FollowUp> {
    let Some(Value::Array(items)) = v else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => trimmed(s).map(|question| FollowUp {
                question,
                reason: String::new(),
            }),
            Value::Object(obj) => Some(FollowUp {
                question: str_field(obj, "question").and_then(trimmed)?,
                reason: text(obj.get("reason")),
            }),
            _ => None,
        })
        .take(cap)
        .collect()
}
