use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, select};
use log::debug;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::cloud::{CloudContext, ObjectStore, Publisher};
use crate::pipeline::{self, FailureState, ObjectLister, ProgressFn, Stats, WorkerContext};
use crate::utils::config::UsageError;
use crate::{Opts, RunConfig, RunOutcome, RunReport, S3Path};

/// Where a run is. Logged at debug on every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Lister and workers running concurrently.
    Publishing,
    /// Every worker exited (queue drained, or aborted on error).
    Drained,
    /// Signal received before drain.
    Interrupted,
    Reported,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Wires lister → bounded queue → publish workers for exactly one run.
pub struct Orchestrator {
    config: Arc<RunConfig>,
    store: Arc<dyn ObjectStore>,
    publisher: Arc<dyn Publisher>,
    stats: Arc<Stats>,
    on_published: Option<ProgressFn>,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        config: RunConfig,
        store: Arc<dyn ObjectStore>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            publisher,
            stats: Arc::new(Stats::new()),
            on_published: None,
            state: RunState::Idle,
        }
    }

    /// Call `f(1)` after every successful publish.
    pub fn with_progress(mut self, f: ProgressFn) -> Self {
        self.on_published = Some(f);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Live counters for this run.
    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    fn transition(&mut self, next: RunState) {
        debug!("run state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// [`run`](Self::run) with the process Ctrl+C / SIGTERM handler installed at this point.
    /// Signals before the call keep their default behavior and end the process. Fails if a
    /// handler is already installed.
    pub fn run_until_signal(self) -> Result<RunOutcome> {
        let interrupt_rx = pipeline::install_interrupt_handler()?;
        self.run(&interrupt_rx)
    }

    /// Run the pipeline until every listed object is published, the first error, or a message on
    /// `interrupt_rx`.
    ///
    /// On interrupt this returns [`RunOutcome::Interrupted`] right away with whatever had been
    /// counted; the lister and workers are left running and are not joined. Callers are expected
    /// to exit the process. Pass [`crossbeam_channel::never`] when there is nothing to listen to.
    pub fn run(mut self, interrupt_rx: &Receiver<()>) -> Result<RunOutcome> {
        let started = Instant::now();
        let failure = FailureState::new();
        let channels = pipeline::create_pipeline_channels(self.config.concurrency);

        let lister = ObjectLister::new(
            Arc::clone(&self.store),
            self.config.source.clone(),
            self.config.limit,
        );
        let ctx = WorkerContext {
            config: Arc::clone(&self.config),
            topic_arn: Arc::from(self.config.topic_arn()),
            publisher: Arc::clone(&self.publisher),
            stats: Arc::clone(&self.stats),
            failure: failure.clone(),
            on_published: self.on_published.clone(),
        };

        self.transition(RunState::Publishing);
        let lister_handle =
            pipeline::spawn_listing_thread(lister, channels.object_tx, failure.clone());
        let worker_handles = pipeline::spawn_publish_workers(
            channels.object_rx,
            &channels.done_tx,
            &ctx,
            self.config.concurrency,
        );
        // Dropping the last non-worker sender lets done_rx disconnect when workers finish.
        drop(channels.done_tx);
        drop(ctx);

        let done_rx = channels.done_rx;
        let interrupted = select! {
            recv(done_rx) -> _ => false,
            recv(interrupt_rx) -> signal => match signal {
                Ok(()) => true,
                // Handler side went away; nothing can interrupt us any more.
                Err(_) => {
                    let _ = done_rx.recv();
                    false
                }
            },
        };

        if interrupted {
            self.transition(RunState::Interrupted);
            let report = RunReport {
                stats: self.stats.snapshot(),
                elapsed: started.elapsed(),
            };
            self.transition(RunState::Reported);
            return Ok(RunOutcome::Interrupted(report));
        }

        let listed = lister_handle
            .join()
            .map_err(|_| anyhow!("lister thread panicked"))?;
        for h in worker_handles {
            h.join().map_err(|_| anyhow!("publish worker panicked"))?;
        }
        self.transition(RunState::Drained);
        debug!("main: queue drained, {} objects listed", listed);

        pipeline::check_for_first_error(&failure)?;

        let report = RunReport {
            stats: self.stats.snapshot(),
            elapsed: started.elapsed(),
        };
        self.transition(RunState::Reported);
        Ok(RunOutcome::Completed(report))
    }
}

/// Check the options that need no remote lookup: source path, topic, concurrency.
pub fn validate_opts(opts: &Opts) -> Result<(S3Path, String)> {
    let source = match opts.s3_path.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => S3Path::parse(p)?,
        _ => return Err(UsageError::new("--s3path not set").into()),
    };
    let topic = match opts.topic.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(UsageError::new("--topic not set").into()),
    };
    if opts.concurrency == 0 {
        return Err(UsageError::new("--concurrency must be at least 1").into());
    }
    Ok((source, topic))
}

/// Turn gathered options into a [`RunConfig`], filling gaps from `cloud`.
///
/// Validation happens before any remote lookup, so a bad flag never costs a network call.
pub fn resolve_run_config(opts: &Opts, cloud: &dyn CloudContext) -> Result<RunConfig> {
    let (source, topic) = validate_opts(opts)?;

    let topic_region = match &opts.region {
        Some(r) if !r.is_empty() => r.clone(),
        _ => cloud.default_region().ok_or_else(|| {
            UsageError::new("no region: pass --region or set AWS_REGION / a profile region")
        })?,
    };
    // Lookups go through the topic region so `--region` alone is enough without a profile.
    let source_region = cloud.bucket_region(&source.bucket, &topic_region)?;
    let account_id = match &opts.account {
        Some(a) if !a.is_empty() => a.clone(),
        _ => cloud.caller_account(&topic_region)?,
    };

    Ok(RunConfig {
        account_id,
        source,
        source_region,
        topic,
        topic_region,
        concurrency: opts.concurrency,
        limit: (opts.limit > 0).then_some(opts.limit),
    })
}
