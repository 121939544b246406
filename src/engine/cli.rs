//! CLI command handler: gather options, resolve the run against AWS, run it, report.

use anyhow::Result;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cloud::AwsContext;
use crate::engine::arg_parser::Cli;
use crate::engine::progress::{create_counter, finish_bar, progress_callback, refresh_bar};
use crate::pipeline::{Orchestrator, resolve_run_config, validate_opts};
use crate::utils::config::PackagePaths;
use crate::utils::{
    ReplayToml, apply_file_to_opts, load_dotenv, load_replay_toml, prompt_required, setup_logging,
};
use crate::{Opts, RunConfig, RunOutcome, StatsSnapshot};

/// Defaults, then config file, then CLI flags.
pub fn build_opts(cli: &Cli, file: Option<&ReplayToml>) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    cli.apply_to_opts(&mut opts);
    opts
}

fn config_path(cli: &Cli) -> (PathBuf, bool) {
    match &cli.config {
        Some(p) => (p.clone(), true),
        None => (
            Path::new(".").join(PackagePaths::get().config_filename()),
            false,
        ),
    }
}

/// Ask for required values that are still missing (interactive mode only).
fn prompt_missing(opts: &mut Opts) -> Result<()> {
    if !opts.interactive {
        return Ok(());
    }
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
    if blank(&opts.s3_path) {
        opts.s3_path = prompt_required(
            "Please enter the s3 path to read from (e.g., s3://<bucket>/<prefix>): ",
        )?;
    }
    if blank(&opts.topic) {
        opts.topic = prompt_required("Please enter topic name to write to: ")?;
    }
    Ok(())
}

fn describe(stats: &StatsSnapshot) -> String {
    format!(
        "{} files ({:.2}MB)",
        stats.files_processed,
        stats.megabytes()
    )
}

fn log_start(config: &RunConfig) {
    let count = match config.limit {
        Some(limit) => format!("{limit} files"),
        None => "files".to_string(),
    };
    info!(
        "sending {} from {} in {} to {} in {} ({} workers)",
        count,
        config.source,
        config.source_region,
        config.topic,
        config.topic_region,
        config.concurrency
    );
}

/// Log the terminal line for a run that did not fail.
pub fn report_outcome(config: &RunConfig, outcome: &RunOutcome) {
    let report = outcome.report();
    match outcome {
        RunOutcome::Completed(_) => info!(
            "sent {} to {} ({}) in {:?}",
            describe(&report.stats),
            config.topic,
            config.topic_region,
            report.elapsed
        ),
        RunOutcome::Interrupted(_) => error!(
            "caught interrupt, sent {} to {} in {:?}",
            describe(&report.stats),
            config.topic,
            report.elapsed
        ),
    }
}

/// Run one replay from the command line. Usage problems come back as
/// [`UsageError`](crate::utils::UsageError) before anything remote is contacted.
pub fn handle_run(cli: &Cli) -> Result<RunOutcome> {
    let (path, required) = config_path(cli);
    let file = load_replay_toml(&path, required)?;
    let mut opts = build_opts(cli, file.as_ref());
    setup_logging(opts.verbose);
    load_dotenv(Path::new("."));

    prompt_missing(&mut opts)?;
    validate_opts(&opts)?;

    let aws = AwsContext::load()?;
    let config = resolve_run_config(&opts, &aws)?;
    if opts.verbose {
        log_start(&config);
    }

    let store = Arc::new(aws.object_store(&config.source_region));
    let publisher = Arc::new(aws.publisher(&config.topic_region));
    let bar = opts.verbose.then(|| {
        let b = create_counter("Replaying");
        refresh_bar(&b);
        b
    });
    let mut orchestrator = Orchestrator::new(config.clone(), store, publisher);
    if let Some(on_published) = progress_callback(&bar) {
        orchestrator = orchestrator.with_progress(on_published);
    }
    let stats = orchestrator.stats();

    let result = orchestrator.run_until_signal();
    if let Some(bar) = &bar {
        finish_bar(bar, stats.snapshot().files_processed as usize);
    }
    match result {
        Ok(outcome) => {
            report_outcome(&config, &outcome);
            Ok(outcome)
        }
        Err(err) => {
            error!("sent {} before failing", describe(&stats.snapshot()));
            Err(err)
        }
    }
}
