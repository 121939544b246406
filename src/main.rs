//! s3replay CLI: list an S3 prefix and publish one ObjectCreated notification per object.

use clap::{CommandFactory, Parser};
use s3replay::RunOutcome;
use s3replay::engine::Cli;
use s3replay::engine::handle_run;
use s3replay::utils::{ExitCodes, UsageError};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    match handle_run(&cli) {
        Ok(RunOutcome::Completed(_)) => {
            log::debug!("Total time: {:?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        // Workers may still be mid-publish; do not wait for them.
        Ok(RunOutcome::Interrupted(_)) => std::process::exit(ExitCodes::INTERRUPTED),
        Err(err) if err.downcast_ref::<UsageError>().is_some() => {
            eprintln!("{err:#}");
            let _ = Cli::command().print_help();
            ExitCode::from(ExitCodes::USAGE)
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(ExitCodes::RUN_FAILED)
        }
    }
}
