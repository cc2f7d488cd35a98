use super::client::pipeline_from_config;
use super::load_request;
use crate::cli::args::{GradeArgs, OutputFormat};
use crate::exit_codes;
use appraise_core::model::GradeOutcome;

pub async fn run(args: GradeArgs) -> anyhow::Result<i32> {
    let pipeline = match pipeline_from_config(&args.config) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{}", msg);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let request = load_request(&args.request)?;

    let outcome = pipeline.grade(&request).await;
    print_outcome(&outcome, args.format)?;
    Ok(exit_codes::SUCCESS)
}

pub(crate) fn print_outcome(outcome: &GradeOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => println!("{}", outcome.feedback_text),
    }
    Ok(())
}
