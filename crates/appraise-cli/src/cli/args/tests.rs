use super::*;
use clap::CommandFactory;
use clap::Parser;

#[test]
fn cli_debug_assert() {
    Cli::command().debug_assert();
}

#[test]
fn grade_parses_with_defaults() {
    let cli = Cli::try_parse_from([
        "appraise",
        "grade",
        "--question",
        "Why us?",
        "--answer",
        "Because.",
    ])
    .expect("parse should succeed");

    match cli.cmd {
        Command::Grade(args) => {
            assert_eq!(args.request.answer.as_deref(), Some("Because."));
            assert_eq!(args.format, OutputFormat::Json);
            assert!(args.request.company.is_none());
        }
        _ => panic!("expected Command::Grade"),
    }
}

#[test]
fn answer_and_answer_file_conflict() {
    let res = Cli::try_parse_from([
        "appraise",
        "grade",
        "--question",
        "Q",
        "--answer",
        "A",
        "--answer-file",
        "a.txt",
    ]);
    assert!(res.is_err());
}

#[test]
fn an_answer_source_is_required() {
    assert!(Cli::try_parse_from(["appraise", "prompt", "--question", "Q"]).is_err());
}

#[test]
fn normalize_parses_scale_and_leniency() {
    let cli = Cli::try_parse_from([
        "appraise",
        "normalize",
        "--raw",
        "out.txt",
        "--scale",
        "percent",
        "--no-leniency",
    ])
    .expect("parse should succeed");

    match cli.cmd {
        Command::Normalize(args) => {
            assert_eq!(args.scale, ScaleArg::Percent);
            assert!(args.no_leniency);
            assert_eq!(args.question, "");
        }
        _ => panic!("expected Command::Normalize"),
    }
}
