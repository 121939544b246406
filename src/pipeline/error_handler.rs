use anyhow::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Run-wide failure state: the first error any thread hit, plus an abort flag the lister and
/// workers check between items. Clones share the same state.
#[derive(Clone, Default)]
pub struct FailureState {
    aborted: Arc<AtomicBool>,
    first_error: Arc<Mutex<Option<Error>>>,
}

impl FailureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `err` if it is the first one, and tell everyone to stop.
    pub fn record(&self, err: Error) {
        let mut slot = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(err);
        } else {
            log::debug!("Dropping follow-on error: {:#}", err);
        }
        self.aborted.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    /// Take the first recorded error, if any.
    pub fn take(&self) -> Option<Error> {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Check pipeline result after joining the lister and workers: the first recorded error, if any,
/// becomes the run's error.
pub fn check_for_first_error(failure: &FailureState) -> Result<()> {
    match failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
