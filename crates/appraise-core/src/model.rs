use crate::errors::{FailureKind, InvariantViolation};
use serde::{Deserialize, Serialize};

pub const SUB_SCORE_MAX: u8 = 10;
pub const OVERALL_MAX: u8 = 100;
pub const PITFALL_LEVEL_MIN: u8 = 1;
pub const PITFALL_LEVEL_MAX: u8 = 3;

/// Per-field item caps.
pub mod limits {
    pub const STRENGTHS: usize = 4;
    pub const GAPS: usize = 4;
    pub const ADDS: usize = 4;
    pub const PITFALLS: usize = 4;
    pub const NEXT: usize = 4;
    pub const KEYWORDS: usize = 6;
    pub const RISK_POINTS: usize = 3;
    pub const LOGIC_FLAWS: usize = 3;
    pub const MISSING_DETAILS: usize = 3;
    pub const IMPROVEMENTS: usize = 3;
    pub const FOLLOW_UPS: usize = 3;
    /// Polished answers shorter than this (in chars) are discarded.
    pub const POLISHED_MIN_CHARS: usize = 20;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub question: String,
    pub answer: String,
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            company: None,
            job_title: None,
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }
}

/// Scale the upstream is asked to score sub-axes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreScale {
    #[default]
    Ten,
    Percent,
}

impl ScoreScale {
    pub fn max(&self) -> u8 {
        match self {
            ScoreScale::Ten => SUB_SCORE_MAX,
            ScoreScale::Percent => OVERALL_MAX,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ten" | "10" | "0-10" => Some(ScoreScale::Ten),
            "percent" | "100" | "0-100" => Some(ScoreScale::Percent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Structure,
    Specificity,
    Logic,
    TechDepth,
    Risk,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Structure,
        Axis::Specificity,
        Axis::Logic,
        Axis::TechDepth,
        Axis::Risk,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Axis::Structure => "structure",
            Axis::Specificity => "specificity",
            Axis::Logic => "logic",
            Axis::TechDepth => "tech_depth",
            Axis::Risk => "risk",
        }
    }

    /// Alternate spellings seen in upstream payloads.
    pub(crate) fn aliases(&self) -> &'static [&'static str] {
        match self {
            Axis::TechDepth => &["techDepth", "tech-depth"],
            _ => &[],
        }
    }
}

/// One integer per axis. Used both for sub-scores (0-10) and the chart (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisScores {
    pub structure: u8,
    pub specificity: u8,
    pub logic: u8,
    pub tech_depth: u8,
    pub risk: u8,
}

impl AxisScores {
    pub fn uniform(value: u8) -> Self {
        Self::from_fn(|_| value)
    }

    pub fn from_fn(mut f: impl FnMut(Axis) -> u8) -> Self {
        Self {
            structure: f(Axis::Structure),
            specificity: f(Axis::Specificity),
            logic: f(Axis::Logic),
            tech_depth: f(Axis::TechDepth),
            risk: f(Axis::Risk),
        }
    }

    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Structure => self.structure,
            Axis::Specificity => self.specificity,
            Axis::Logic => self.logic,
            Axis::TechDepth => self.tech_depth,
            Axis::Risk => self.risk,
        }
    }

    pub fn values(&self) -> [u8; 5] {
        Axis::ALL.map(|axis| self.get(axis))
    }

    pub fn map(&self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::from_fn(|axis| f(self.get(axis)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::S,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Behavior,
    Tech,
    Architecture,
    Incident,
    Data,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Behavior,
        Category::Tech,
        Category::Architecture,
        Category::Incident,
        Category::Data,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Behavior => "behavior",
            Category::Tech => "tech",
            Category::Architecture => "architecture",
            Category::Incident => "incident",
            Category::Data => "data",
            Category::General => "general",
        }
    }

    /// Resolve an upstream label, including the legacy prompt vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        let norm = label.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let category = match norm.as_str() {
            "behavior" | "behaviour" | "behavioral" | "culture" | "collaboration"
            | "ownership" | "leadership" | "communication" | "teamwork" => Category::Behavior,
            "tech" | "technical" | "tech_depth" | "problem_solving" | "coding" => Category::Tech,
            "architecture" | "system_design" | "design" => Category::Architecture,
            "incident" | "troubleshooting" | "outage" | "operations" => Category::Incident,
            "data" | "database" | "analytics" => Category::Data,
            "general" => Category::General,
            _ => return None,
        };
        Some(category)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitfall {
    pub text: String,
    pub level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub before: String,
    pub after: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub question: String,
    pub reason: String,
}

/// Canonical grading result. Every field is always present and in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub overall_score: u8,
    pub sub_scores: AxisScores,
    pub grade: Grade,
    pub category: Category,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub adds: Vec<String>,
    pub next: Vec<String>,
    pub keywords: Vec<String>,
    pub risk_points: Vec<String>,
    pub logic_flaws: Vec<String>,
    pub missing_details: Vec<String>,
    pub pitfalls: Vec<Pitfall>,
    pub improvements: Vec<Improvement>,
    pub follow_up_questions: Vec<FollowUp>,
    pub polished_answer: String,
    pub summary_interviewer: String,
    pub summary_coach: String,
    pub chart: AxisScores,
}

impl Evaluation {
    /// Safe default used when grading fails: zero score, empty lists.
    pub fn fallback(category: Category) -> Self {
        Self {
            overall_score: 0,
            sub_scores: AxisScores::uniform(0),
            grade: Grade::F,
            category,
            strengths: Vec::new(),
            gaps: Vec::new(),
            adds: Vec::new(),
            next: Vec::new(),
            keywords: Vec::new(),
            risk_points: Vec::new(),
            logic_flaws: Vec::new(),
            missing_details: Vec::new(),
            pitfalls: Vec::new(),
            improvements: Vec::new(),
            follow_up_questions: Vec::new(),
            polished_answer: String::new(),
            summary_interviewer: String::new(),
            summary_coach: String::new(),
            chart: AxisScores::uniform(0),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.overall_score > OVERALL_MAX {
            return Err(InvariantViolation::new(
                "overallScore",
                format!("{} exceeds {}", self.overall_score, OVERALL_MAX),
            ));
        }
        if Grade::from_score(self.overall_score) != self.grade {
            return Err(InvariantViolation::new(
                "grade",
                format!(
                    "grade {} does not match overall score {}",
                    self.grade, self.overall_score
                ),
            ));
        }
        for axis in Axis::ALL {
            let sub = self.sub_scores.get(axis);
            if sub > SUB_SCORE_MAX {
                return Err(InvariantViolation::new(
                    "subScores",
                    format!("{} = {} exceeds {}", axis.key(), sub, SUB_SCORE_MAX),
                ));
            }
            if self.chart.get(axis) != sub * 10 {
                return Err(InvariantViolation::new(
                    "chart",
                    format!("{} is not derived from its sub-score", axis.key()),
                ));
            }
        }

        let lists: [(&'static str, &[String], usize); 8] = [
            ("strengths", &self.strengths, limits::STRENGTHS),
            ("gaps", &self.gaps, limits::GAPS),
            ("adds", &self.adds, limits::ADDS),
            ("next", &self.next, limits::NEXT),
            ("keywords", &self.keywords, limits::KEYWORDS),
            ("riskPoints", &self.risk_points, limits::RISK_POINTS),
            ("logicFlaws", &self.logic_flaws, limits::LOGIC_FLAWS),
            ("missingDetails", &self.missing_details, limits::MISSING_DETAILS),
        ];
        for (field, items, cap) in lists {
            check_cap(field, items.len(), cap)?;
            if let Some(bad) = items.iter().find(|s| !is_clean_line(s)) {
                return Err(InvariantViolation::new(
                    field,
                    format!("entry {:?} is not a trimmed non-empty line", bad),
                ));
            }
        }

        check_cap("pitfalls", self.pitfalls.len(), limits::PITFALLS)?;
        for p in &self.pitfalls {
            if !is_clean_line(&p.text) {
                return Err(InvariantViolation::new("pitfalls", "empty pitfall text"));
            }
            if let Some(level) = p.level {
                if !(PITFALL_LEVEL_MIN..=PITFALL_LEVEL_MAX).contains(&level) {
                    return Err(InvariantViolation::new(
                        "pitfalls",
                        format!("level {} outside 1..=3", level),
                    ));
                }
            }
        }

        check_cap("improvements", self.improvements.len(), limits::IMPROVEMENTS)?;
        if self
            .improvements
            .iter()
            .any(|im| im.before.trim().is_empty() || im.after.trim().is_empty())
        {
            return Err(InvariantViolation::new(
                "improvements",
                "improvement without before/after",
            ));
        }

        check_cap(
            "followUpQuestions",
            self.follow_up_questions.len(),
            limits::FOLLOW_UPS,
        )?;
        if self
            .follow_up_questions
            .iter()
            .any(|f| f.question.trim().is_empty())
        {
            return Err(InvariantViolation::new(
                "followUpQuestions",
                "follow-up without question text",
            ));
        }

        let polished_len = self.polished_answer.chars().count();
        if polished_len > 0 && polished_len < limits::POLISHED_MIN_CHARS {
            return Err(InvariantViolation::new(
                "polishedAnswer",
                format!("{} chars is below the usable minimum", polished_len),
            ));
        }
        Ok(())
    }
}

fn check_cap(field: &'static str, len: usize, cap: usize) -> Result<(), InvariantViolation> {
    if len > cap {
        return Err(InvariantViolation::new(
            field,
            format!("{} items exceed cap {}", len, cap),
        ));
    }
    Ok(())
}

fn is_clean_line(s: &str) -> bool {
    !s.is_empty() && s.trim() == s && !s.contains('\n')
}

/// Whether the result came from the upstream or from the fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeStatus {
    #[default]
    Graded,
    Fallback(FailureKind),
}

/// Output contract: `{ data, feedbackText }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOutcome {
    pub data: Evaluation,
    pub feedback_text: String,
    #[serde(skip)]
    pub status: GradeStatus,
}

impl GradeOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, GradeStatus::Fallback(_))
    }
}
