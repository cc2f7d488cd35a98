use super::load_request;
use crate::cli::args::PromptArgs;
use crate::exit_codes;
use appraise_core::prompt::{build_prompt, PromptOptions};

pub fn run(args: PromptArgs) -> anyhow::Result<i32> {
    let request = load_request(&args.request)?;
    let opts = PromptOptions {
        scale: args.scale.into(),
        language: args.language,
    };
    let prompt = build_prompt(&request, &opts);
    println!("=== system ===\n{}\n\n=== user ===\n{}", prompt.system, prompt.user);
    Ok(exit_codes::SUCCESS)
}
