//! Progress counter for verbose runs. Total is unknown while listing streams, so this is a
//! counter, not a percentage bar.

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::pipeline::ProgressFn;

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count and rate without percentage).
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so the counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Move the bar to `count`. Uses try_lock so publish workers never wait on the terminal; a
/// skipped update is covered by the next one since the count is absolute.
pub fn update_progress_to(pb: &ProgressBar, count: usize) {
    if let Ok(mut pb) = pb.try_lock()
        && count > pb.counter
    {
        let _ = pb.update_to(count);
    }
}

/// Progress callback for [`Orchestrator::with_progress`](crate::pipeline::Orchestrator::with_progress).
/// Counts in an atomic so no increment is lost when the bar is busy.
pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<ProgressFn> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        let published = Arc::new(AtomicUsize::new(0));
        Arc::new(move |n: usize| {
            let count = published.fetch_add(n, Ordering::Relaxed) + n;
            update_progress_to(&bar, count);
        }) as ProgressFn
    })
}

/// Settle the counter on the final `count` and leave its line on screen before the summary.
pub fn finish_bar(pb: &ProgressBar, count: usize) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update_to(count);
        let _ = bar.refresh();
        eprintln!();
    }
}
