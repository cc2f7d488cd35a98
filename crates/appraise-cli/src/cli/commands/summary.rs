use super::read_jsonl;
use crate::cli::args::SummaryArgs;
use crate::exit_codes;
use appraise_core::session::{summarize, SessionItem};

pub fn run(args: SummaryArgs) -> anyhow::Result<i32> {
    let items: Vec<SessionItem> = match read_jsonl(&args.input) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(exit_codes::COMMAND_FAILED);
        }
    };
    println!("{}", serde_json::to_string_pretty(&summarize(&items))?);
    Ok(exit_codes::SUCCESS)
}
