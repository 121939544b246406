//! Pipeline channels and the per-worker shared context.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;

use crate::cloud::Publisher;
use crate::utils::config::PipelineConsts;
use crate::{ObjectDescriptor, RunConfig};

use super::error_handler::FailureState;
use super::stats::Stats;

/// Called with `1` after each successful publish (drives the progress counter).
pub type ProgressFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Everything a publish worker reads. Cheap to clone: all `Arc`s.
#[derive(Clone)]
pub struct WorkerContext {
    pub config: Arc<RunConfig>,
    pub topic_arn: Arc<str>,
    pub publisher: Arc<dyn Publisher>,
    pub stats: Arc<Stats>,
    pub failure: FailureState,
    pub on_published: Option<ProgressFn>,
}

/// Channels for one run. Lister gets `object_tx`; workers get `object_rx` and a clone of
/// `done_tx` each. `done_rx` disconnects once the last worker has exited.
pub struct PipelineChannels {
    pub object_tx: Sender<ObjectDescriptor>,
    pub object_rx: Receiver<ObjectDescriptor>,
    pub done_tx: Sender<()>,
    pub done_rx: Receiver<()>,
}

pub fn create_pipeline_channels(concurrency: usize) -> PipelineChannels {
    let (object_tx, object_rx) =
        bounded::<ObjectDescriptor>(PipelineConsts::queue_cap(concurrency));
    let (done_tx, done_rx) = bounded::<()>(0);
    PipelineChannels {
        object_tx,
        object_rx,
        done_tx,
        done_rx,
    }
}
