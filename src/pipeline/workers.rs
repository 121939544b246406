use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::ObjectDescriptor;

use super::context::WorkerContext;
use super::notification::encode_notification;

/// Single publish worker: take objects from `object_rx` until it closes or the run aborts.
/// Holding `_done_tx` until return is how the orchestrator learns this worker has exited.
fn publish_worker_loop(
    object_rx: Receiver<ObjectDescriptor>,
    ctx: WorkerContext,
    _done_tx: Sender<()>,
) {
    while let Ok(object) = object_rx.recv() {
        if ctx.failure.is_aborted() {
            break;
        }
        match publish_object(&object, &ctx) {
            Ok(()) => {
                ctx.stats.record(object.size);
                if let Some(on_published) = &ctx.on_published {
                    on_published(1);
                }
            }
            Err(err) => {
                ctx.failure.record(err);
                break;
            }
        }
    }
}

/// Encode then publish one object. Stats are only touched by the caller once this returns Ok.
pub fn publish_object(object: &ObjectDescriptor, ctx: &WorkerContext) -> Result<()> {
    let message = encode_notification(object, &ctx.config)?;
    ctx.publisher
        .publish(&ctx.topic_arn, &message)
        .with_context(|| format!("publish {} to {}", object.key, ctx.topic_arn))
}

/// Spawn `num_workers` publish workers sharing `object_rx`. Caller must drop its own `done_tx`
/// after this so the done channel closes when the last worker exits.
pub fn spawn_publish_workers(
    object_rx: Receiver<ObjectDescriptor>,
    done_tx: &Sender<()>,
    ctx: &WorkerContext,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let object_rx = object_rx.clone();
            let done_tx = done_tx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || publish_worker_loop(object_rx, ctx, done_tx))
        })
        .collect()
}
