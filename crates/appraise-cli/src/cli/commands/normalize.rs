use super::grade::print_outcome;
use crate::cli::args::NormalizeArgs;
use crate::exit_codes;
use appraise_core::providers::generation::ScriptedClient;
use appraise_core::score::ScorePolicy;
use appraise_core::{GenerationRequest, GradingPipeline, PipelineOptions};
use std::sync::Arc;

/// Replays captured upstream text through the pipeline without any network call.
pub async fn run(args: NormalizeArgs) -> anyhow::Result<i32> {
    let raw = match std::fs::read_to_string(&args.raw) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("failed to read {}: {}", args.raw.display(), e);
            return Ok(exit_codes::COMMAND_FAILED);
        }
    };

    let options = PipelineOptions {
        scale: args.scale.into(),
        policy: ScorePolicy {
            leniency: !args.no_leniency,
        },
        ..PipelineOptions::default()
    };
    let client = ScriptedClient::repeating(raw).with_model("captured");
    let pipeline = GradingPipeline::new(Arc::new(client), options);

    let outcome = pipeline
        .grade(&GenerationRequest::new(args.question, String::new()))
        .await;
    print_outcome(&outcome, args.format)?;
    Ok(exit_codes::SUCCESS)
}
