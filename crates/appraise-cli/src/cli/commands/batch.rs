use super::client::pipeline_from_config;
use super::read_jsonl;
use crate::cli::args::BatchArgs;
use crate::exit_codes;
use appraise_core::GenerationRequest;

pub async fn run(args: BatchArgs) -> anyhow::Result<i32> {
    let pipeline = match pipeline_from_config(&args.config) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{}", msg);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let requests: Vec<GenerationRequest> = match read_jsonl(&args.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::COMMAND_FAILED);
        }
    };

    let outcomes = pipeline.grade_many(&requests, args.concurrency).await;
    let fallbacks = outcomes.iter().filter(|o| o.is_fallback()).count();
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }
    tracing::info!(total = outcomes.len(), fallbacks, "batch finished");
    Ok(exit_codes::SUCCESS)
}
