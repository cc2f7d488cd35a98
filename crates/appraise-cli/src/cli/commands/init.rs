use crate::cli::args::InitArgs;
use crate::exit_codes;
use appraise_core::config::write_sample_config;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.path.exists() {
        println!("Skipped {} (exists)", args.path.display());
        return Ok(exit_codes::SUCCESS);
    }
    if let Err(e) = write_sample_config(&args.path) {
        eprintln!("{}", e);
        return Ok(exit_codes::CONFIG_ERROR);
    }
    println!("Created {}", args.path.display());
    Ok(exit_codes::SUCCESS)
}
