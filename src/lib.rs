//! s3replay: replay S3 "ObjectCreated" notifications for objects that already exist.
//!
//! Lists a bucket prefix and publishes, for every object, the event S3 would have sent to the
//! log processor's SNS topic. Useful to backfill after notifications were missed or disabled.

pub mod cloud;
pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::sync::Arc;

use cloud::{ObjectStore, Publisher};
use pipeline::Orchestrator;

/// Result alias used by public s3replay API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point for library use: replay every object under `config.source` to
/// `config.topic` and return the final report.
///
/// No signal handling is installed; a run only ends by draining or by its first error. Use
/// [`Orchestrator`] directly with [`pipeline::install_interrupt_handler`] for CLI-style
/// interrupt reporting.
///
/// ```ignore
/// let aws = s3replay::cloud::AwsContext::load()?;
/// let store = Arc::new(aws.object_store(&config.source_region));
/// let publisher = Arc::new(aws.publisher(&config.topic_region));
/// let report = s3replay::replay_prefix(config, store, publisher)?;
/// println!("{} files", report.stats.files_processed);
/// ```
pub fn replay_prefix(
    config: RunConfig,
    store: Arc<dyn ObjectStore>,
    publisher: Arc<dyn Publisher>,
) -> Result<RunReport> {
    debug!(
        "{} CONFIG:{:#?}",
        utils::config::PackagePaths::get().env_prefix(),
        config
    );
    let outcome = Orchestrator::new(config, store, publisher).run(&crossbeam_channel::never())?;
    Ok(*outcome.report())
}
