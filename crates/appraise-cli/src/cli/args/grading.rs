use super::common::{OutputFormat, RequestArgs, ScaleArg};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct GradeArgs {
    #[arg(long, default_value = "appraise.yaml", env = "APPRAISE_CONFIG")]
    pub config: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Clone, Debug)]
pub struct BatchArgs {
    #[arg(long, default_value = "appraise.yaml", env = "APPRAISE_CONFIG")]
    pub config: PathBuf,

    /// JSONL file, one `{company?, jobTitle?, question, answer}` per line
    #[arg(long)]
    pub input: PathBuf,

    /// Maximum requests in flight
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

#[derive(Args, Clone, Debug)]
pub struct NormalizeArgs {
    /// File holding the raw upstream text
    #[arg(long)]
    pub raw: PathBuf,

    /// Question the answer was given to (drives the category fallback)
    #[arg(long, default_value = "")]
    pub question: String,

    /// Scale the upstream was asked to use
    #[arg(long, value_enum, default_value_t = ScaleArg::Ten)]
    pub scale: ScaleArg,

    /// Average raw sub-scores without lifting low ones
    #[arg(long)]
    pub no_leniency: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Clone, Debug)]
pub struct PromptArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(long, value_enum, default_value_t = ScaleArg::Ten)]
    pub scale: ScaleArg,

    /// Language for textual feedback fields
    #[arg(long, default_value = "English")]
    pub language: String,
}
