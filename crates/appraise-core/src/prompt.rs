use crate::model::{limits, GenerationRequest, ScoreScale};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const UNSPECIFIED: &str = "unspecified";

/// System and user instructions for one grading call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub scale: ScoreScale,
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            scale: ScoreScale::Ten,
            language: "English".to_string(),
        }
    }
}

pub fn build_prompt(req: &GenerationRequest, opts: &PromptOptions) -> GenerationPrompt {
    GenerationPrompt {
        system: system_prompt(opts),
        user: user_prompt(req, opts),
    }
}

fn or_unspecified(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNSPECIFIED,
    }
}

fn scale_range(scale: ScoreScale) -> String {
    format!("0-{}", scale.max())
}

fn system_prompt(opts: &PromptOptions) -> String {
    let range = scale_range(opts.scale);
    format!(
        "You are a senior technical interview coach.\n\
         \n\
         Goal:\n\
         - Evaluate the candidate's answer and give feedback they can act on before their next interview.\n\
         - Judge what the candidate actually did and achieved, not how polished the wording sounds.\n\
         - Write every textual value in {language}.\n\
         \n\
         Scoring axes (integers, {range}):\n\
         - structure: flow of the answer, completeness from a STAR (Situation-Task-Action-Result) view\n\
         - specificity: concrete examples, numbers, metrics, tool names\n\
         - logic: problem -> approach -> execution -> result coherence\n\
         - tech_depth: technical depth, reasons behind architecture and tool choices\n\
         - risk: awareness of risk, quality, stability and security\n\
         \n\
         JSON fields:\n\
         - score_overall: number (0-100)\n\
         - scores: {{ structure, specificity, logic, tech_depth, risk }} ({range} each)\n\
         - strengths: string[] (at most {strengths})\n\
         - gaps: string[] (at most {gaps})\n\
         - adds: string[] (at most {adds}) things worth adding to the answer\n\
         - pitfalls: {{ text: string, level: 1|2|3 }}[] (at most {pitfalls}) risks to avoid in the interview, level 3 is most severe\n\
         - next: string[] (at most {next}) action items before the next interview\n\
         - logic_flaws: string[] (at most {logic_flaws})\n\
         - missing_details: string[] (at most {missing_details})\n\
         - risk_points: string[] (at most {risk_points})\n\
         - improvements: {{ before: string, after: string, reason: string }}[] (at most {improvements})\n\
         - polished: string, a model answer the candidate could say aloud, two paragraphs at most\n\
         - follow_up_questions: {{ question: string, reason: string }}[] (at most {follow_ups})\n\
         - keywords: string[] (at most {keywords})\n\
         - summary_interviewer: string, one paragraph from the interviewer's view\n\
         - summary_coach: string, one paragraph of advice to the candidate\n\
         - category: one of \"behavior\", \"tech\", \"architecture\", \"incident\", \"data\", \"general\"\n\
         \n\
         Format rules:\n\
         - Return exactly one valid JSON object and nothing else.\n\
         - No prose before or after the JSON, no markdown, no code fences.\n\
         - Include every field even when empty (use [] or \"\").\n\
         - Keep each list item to one short sentence; keep the whole JSON under 5000 characters.",
        language = opts.language,
        range = range,
        strengths = limits::STRENGTHS,
        gaps = limits::GAPS,
        adds = limits::ADDS,
        pitfalls = limits::PITFALLS,
        next = limits::NEXT,
        logic_flaws = limits::LOGIC_FLAWS,
        missing_details = limits::MISSING_DETAILS,
        risk_points = limits::RISK_POINTS,
        improvements = limits::IMPROVEMENTS,
        follow_ups = limits::FOLLOW_UPS,
        keywords = limits::KEYWORDS,
    )
}

fn example_payload(scale: ScoreScale) -> serde_json::Value {
    let s = match scale {
        ScoreScale::Ten => 8,
        ScoreScale::Percent => 80,
    };
    json!({
        "score_overall": 80,
        "scores": { "structure": s, "specificity": s, "logic": s, "tech_depth": s, "risk": s },
        "strengths": ["Gives concrete numbers and examples", "Own role in the collaboration is clear"],
        "gaps": ["Little explanation of why the technology was chosen"],
        "adds": ["State the performance gain as a number"],
        "pitfalls": [{ "text": "Avoid unexplained jargon", "level": 2 }],
        "next": ["Prepare one or two more stories like this one"],
        "logic_flaws": [],
        "missing_details": ["Before/after comparison figures"],
        "risk_points": ["No mention of a testing strategy"],
        "improvements": [{
            "before": "I briefly described the problem.",
            "after": "CPU sat above 90% and responses took over a second, so we had to act within the sprint.",
            "reason": "Makes the situation and its severity concrete."
        }],
        "polished": "A polished model answer goes here, natural enough to say aloud in the interview.",
        "follow_up_questions": [{
            "question": "What was the hardest decision in that process?",
            "reason": "Probes the candidate's decision criteria and priorities."
        }],
        "keywords": ["refactoring", "quality", "collaboration", "test automation"],
        "summary_interviewer": "The candidate clearly explained how refactoring and test automation improved quality.",
        "summary_coach": "Structure and logic are solid; back the results with numbers to make the answer stronger.",
        "category": "tech"
    })
}

fn user_prompt(req: &GenerationRequest, opts: &PromptOptions) -> String {
    let example = serde_json::to_string_pretty(&example_payload(opts.scale))
        .unwrap_or_else(|_| "{}".to_string());
    format!(
        "Company: {company}\n\
         Role: {role}\n\
         \n\
         Interview question:\n\
         {question}\n\
         \n\
         Candidate answer:\n\
         {answer}\n\
         \n\
         Evaluate the answer using the JSON schema described above.\n\
         Return JSON only, shaped like the example below (recompute every value; the example only shows the structure):\n\
         {example}\n",
        company = or_unspecified(req.company.as_deref()),
        role = or_unspecified(req.job_title.as_deref()),
        question = req.question,
        answer = req.answer,
        example = example,
    )
}
