use super::args::*;

pub mod batch;
pub mod client;
pub mod grade;
pub mod init;
pub mod normalize;
pub mod prompt;
pub mod summary;

use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Grade(args) => grade::run(args).await,
        Command::Batch(args) => batch::run(args).await,
        Command::Normalize(args) => normalize::run(args).await,
        Command::Prompt(args) => prompt::run(args),
        Command::Summary(args) => summary::run(args),
        Command::Init(args) => init::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Builds the core request, reading the answer file when one is given.
pub(crate) fn load_request(args: &RequestArgs) -> anyhow::Result<appraise_core::GenerationRequest> {
    let answer = match (&args.answer, &args.answer_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read answer file {}: {}", path.display(), e))?,
        (None, None) => anyhow::bail!("one of --answer or --answer-file is required"),
    };
    Ok(appraise_core::GenerationRequest {
        company: args.company.clone(),
        job_title: args.job_title.clone(),
        question: args.question.clone(),
        answer,
    })
}

/// Non-empty lines of a JSONL file, parsed one by one.
pub(crate) fn read_jsonl<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> anyhow::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                anyhow::anyhow!("{}:{}: invalid JSON line: {}", path.display(), i + 1, e)
            })
        })
        .collect()
}
