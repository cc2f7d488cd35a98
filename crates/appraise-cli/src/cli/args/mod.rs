use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub mod grading;
pub use common::*;
pub use grading::*;

#[derive(Parser)]
#[command(
    name = "appraise",
    version,
    about = "Grade interview practice answers into a structured evaluation with written feedback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Grade a single answer
    Grade(GradeArgs),
    /// Grade a JSONL file of requests, one result line per request
    Batch(BatchArgs),
    /// Re-run extraction and normalization on captured upstream output (offline)
    Normalize(NormalizeArgs),
    /// Print the instructions sent to the generation service
    Prompt(PromptArgs),
    /// Summarize a session from a JSONL file of graded items
    Summary(SummaryArgs),
    /// Write a sample appraise.yaml
    Init(InitArgs),
    Version,
}

#[derive(clap::Args, Clone, Debug)]
pub struct SummaryArgs {
    /// JSONL file, one `{category, answered, overallScore, durationMs}` per line
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(clap::Args, Clone, Debug)]
pub struct InitArgs {
    #[arg(long, default_value = "appraise.yaml")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests;
