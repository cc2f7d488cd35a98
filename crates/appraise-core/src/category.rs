//! Keyword classifier used when the upstream gives no usable category.
//!
//! Rules are checked in table order against the lowercased question; the first
//! category with a hit wins. Latin keywords match at word boundaries, and a
//! trailing `*` marks a stem that may run on ("scalab*" hits "scalability").
//! Hangul keywords match as plain substrings since particles attach to them.

use crate::model::Category;
use lazy_static::lazy_static;
use regex::Regex;

const RULES: &[(Category, &[&str])] = &[
    (
        Category::Incident,
        &[
            "incident*",
            "outage*",
            "postmortem*",
            "post-mortem*",
            "on-call",
            "downtime",
            "root cause*",
            "장애",
            "사고",
            "복구",
        ],
    ),
    (
        Category::Architecture,
        &[
            "architect*",
            "system design*",
            "scalab*",
            "microservice*",
            "monolith*",
            "distributed",
            "아키텍처",
            "설계",
            "확장성",
        ],
    ),
    (
        Category::Data,
        &[
            "data",
            "database*",
            "sql",
            "query",
            "queries",
            "etl",
            "analytics",
            "데이터",
            "쿼리",
            "분석",
        ],
    ),
    (
        Category::Tech,
        &[
            "performance",
            "algorithm*",
            "framework*",
            "api",
            "apis",
            "optimiz*",
            "debug*",
            "code",
            "coding",
            "testing",
            "기술",
            "성능",
            "최적화",
            "코드",
            "테스트",
        ],
    ),
    (
        Category::Behavior,
        &[
            "tell me about a time",
            "conflict*",
            "team*",
            "collaborat*",
            "leader*",
            "feedback",
            "mistake*",
            "failure*",
            "motivat*",
            "갈등",
            "협업",
            "팀",
            "리더",
            "실패",
            "동기",
        ],
    ),
];

fn keyword_pattern(keyword: &str) -> String {
    let (word, stem) = match keyword.strip_suffix('*') {
        Some(w) => (w, true),
        None => (keyword, false),
    };
    let escaped = regex::escape(word);
    if !word.is_ascii() {
        escaped
    } else if stem {
        format!(r"\b{}", escaped)
    } else {
        format!(r"\b{}\b", escaped)
    }
}

lazy_static! {
    static ref MATCHERS: Vec<(Category, Regex)> = RULES
        .iter()
        .map(|(category, keywords)| {
            let alternation: Vec<String> = keywords.iter().map(|k| keyword_pattern(k)).collect();
            (*category, Regex::new(&alternation.join("|")).unwrap())
        })
        .collect();
}

pub fn classify_question(question: &str) -> Category {
    let haystack = question.to_lowercase();
    MATCHERS
        .iter()
        .find(|(_, re)| re.is_match(&haystack))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// Upstream label if recognized, else the classifier's answer for `question`.
pub fn resolve(label: Option<&str>, question: &str) -> Category {
    label
        .and_then(Category::from_label)
        .unwrap_or_else(|| classify_question(question))
}
