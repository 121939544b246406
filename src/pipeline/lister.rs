//! Object listing: paginated iterator over a bucket prefix, and the producer thread that feeds
//! the work queue from it.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::cloud::{ListRequest, ObjectStore};
use crate::utils::config::ListingConsts;
use crate::{ObjectDescriptor, S3Path};

use super::error_handler::FailureState;

/// Lists every object under a bucket prefix, optionally capped at `limit`.
///
/// Each call to [`iter`](ObjectLister::iter) starts over from the first page. An iterator cannot
/// be resumed once it has ended or failed.
#[derive(Clone)]
pub struct ObjectLister {
    store: Arc<dyn ObjectStore>,
    source: S3Path,
    limit: Option<u64>,
}

impl ObjectLister {
    pub fn new(store: Arc<dyn ObjectStore>, source: S3Path, limit: Option<u64>) -> Self {
        Self {
            store,
            source,
            limit,
        }
    }

    pub fn source(&self) -> &S3Path {
        &self.source
    }

    pub fn iter(&self) -> ObjectIter {
        ObjectIter {
            store: Arc::clone(&self.store),
            source: self.source.clone(),
            limit: self.limit,
            buffer: VecDeque::new(),
            continuation_token: None,
            done: false,
            yielded: 0,
            pages_fetched: 0,
        }
    }
}

/// Lazy page-at-a-time listing. Yields `Err` at most once, then ends.
pub struct ObjectIter {
    store: Arc<dyn ObjectStore>,
    source: S3Path,
    limit: Option<u64>,
    buffer: VecDeque<ObjectDescriptor>,
    continuation_token: Option<String>,
    /// No more pages to fetch (last page seen, or a fetch failed).
    done: bool,
    yielded: u64,
    pages_fetched: usize,
}

impl ObjectIter {
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    /// Ask for no more keys than the limit still allows.
    fn page_size_hint(&self) -> Option<usize> {
        self.limit.map(|limit| {
            let remaining = limit.saturating_sub(self.yielded);
            usize::try_from(remaining)
                .unwrap_or(usize::MAX)
                .min(ListingConsts::MAX_KEYS_PER_PAGE)
        })
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let request = ListRequest {
            bucket: self.source.bucket.clone(),
            prefix: self.source.prefix.clone(),
            continuation_token: self.continuation_token.take(),
            max_keys: self.page_size_hint(),
        };
        let page = self
            .store
            .list_page(&request)
            .with_context(|| format!("list {}", self.source))?;
        self.pages_fetched += 1;
        self.buffer.extend(
            page.objects
                .into_iter()
                .filter(|o| !o.is_folder_marker()),
        );
        match page.next_continuation_token {
            Some(token) => self.continuation_token = Some(token),
            None => self.done = true,
        }
        Ok(())
    }
}

impl Iterator for ObjectIter {
    type Item = Result<ObjectDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.limit_reached() {
                return None;
            }
            if let Some(object) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(object));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.fetch_next_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

/// Spawn the producer thread: list objects and send each one on `object_tx`.
/// Returns the number of objects queued.
pub fn spawn_listing_thread(
    lister: ObjectLister,
    object_tx: Sender<ObjectDescriptor>,
    failure: FailureState,
) -> JoinHandle<u64> {
    thread::spawn(move || run_listing_loop(lister.iter(), object_tx, &failure))
}

/// Drain `iter` into `object_tx`. Stops on the first listing error (recorded in `failure`), when
/// the run has been aborted, or when every receiver is gone. Drops `object_tx` when done so
/// workers see the queue close.
pub fn run_listing_loop<I>(
    mut iter: I,
    object_tx: Sender<ObjectDescriptor>,
    failure: &FailureState,
) -> u64
where
    I: Iterator<Item = Result<ObjectDescriptor>>,
{
    let mut count = 0_u64;
    while !failure.is_aborted() {
        let Some(outcome) = iter.next() else {
            break;
        };
        match outcome {
            Ok(object) => {
                if object_tx.send(object).is_err() {
                    break;
                }
                count += 1;
            }
            Err(err) => {
                failure.record(err);
                break;
            }
        }
    }
    log::debug!("lister: queued {} objects", count);
    drop(object_tx);
    count
}
