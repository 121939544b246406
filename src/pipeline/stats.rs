//! Run counters shared by every publish worker.

use std::sync::{Mutex, PoisonError};

use crate::StatsSnapshot;

/// Files/bytes published so far. Owned by the orchestrator, shared with workers by `Arc`.
///
/// Both counters sit behind one mutex that is held only for the two additions, so a
/// [`snapshot`](Stats::snapshot) never sees a file counted without its bytes.
#[derive(Debug, Default)]
pub struct Stats {
    inner: Mutex<StatsSnapshot>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully published object of `size` bytes.
    pub fn record(&self, size: u64) {
        let mut s = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        s.files_processed += 1;
        s.bytes_processed += size;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
