//! SIGINT/SIGTERM → channel. The handler does nothing but forward; the orchestrator decides what
//! an interrupt means (snapshot, report, stop waiting).

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, bounded};

/// Install the process-wide Ctrl+C / SIGTERM handler. Returns the receiving end to pass to
/// [`Orchestrator::run`](super::Orchestrator::run). Can only be installed once per process.
pub fn install_interrupt_handler() -> Result<Receiver<()>> {
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        // Full means a signal is already pending; one is enough.
        let _ = interrupt_tx.try_send(());
    })
    .context("set Ctrl+C handler")?;
    Ok(interrupt_rx)
}
