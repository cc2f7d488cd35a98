//! Shared argument types used across multiple commands.

use appraise_core::model::ScoreScale;
use clap::ValueEnum;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleArg {
    /// Sub-scores requested on 0-10
    #[default]
    Ten,
    /// Sub-scores requested on 0-100
    Percent,
}

impl From<ScaleArg> for ScoreScale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Ten => ScoreScale::Ten,
            ScaleArg::Percent => ScoreScale::Percent,
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct RequestArgs {
    #[arg(long)]
    pub question: String,

    /// Candidate answer text
    #[arg(long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
    pub answer: Option<String>,

    /// Read the candidate answer from a file
    #[arg(long)]
    pub answer_file: Option<std::path::PathBuf>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub job_title: Option<String>,
}
