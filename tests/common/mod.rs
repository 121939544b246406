//! In-memory stand-ins for S3, SNS and the AWS session, shared by the integration tests.
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use crossbeam_channel::Receiver;
use s3replay::cloud::{CloudContext, ListPage, ListRequest, ObjectStore, Publisher};
use s3replay::{ObjectDescriptor, RunConfig, S3Path};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn objects(specs: &[(&str, u64)]) -> Vec<ObjectDescriptor> {
    specs
        .iter()
        .map(|(k, s)| ObjectDescriptor::new(*k, *s))
        .collect()
}

pub fn run_config(bucket: &str, prefix: &str, concurrency: usize, limit: Option<u64>) -> RunConfig {
    RunConfig {
        account_id: "123456789012".to_string(),
        source: S3Path {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        },
        source_region: "us-west-2".to_string(),
        topic: "processed-data".to_string(),
        topic_region: "us-east-1".to_string(),
        concurrency,
        limit,
    }
}

/// Pages served in order; page `i` carries continuation token `"page-{i+1}"` when more follow.
pub struct MemoryStore {
    pages: Vec<Vec<ObjectDescriptor>>,
    /// Fail when asked for this page index.
    fail_at: Option<usize>,
    pub requests: Mutex<Vec<ListRequest>>,
}

impl MemoryStore {
    pub fn new(pages: Vec<Vec<ObjectDescriptor>>) -> Self {
        Self {
            pages,
            fail_at: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single_page(objects: Vec<ObjectDescriptor>) -> Self {
        Self::new(vec![objects])
    }

    pub fn failing_at(mut self, page: usize) -> Self {
        self.fail_at = Some(page);
        self
    }

    pub fn fetches(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn page_index(token: Option<&str>) -> usize {
        token
            .and_then(|t| t.strip_prefix("page-"))
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }
}

impl ObjectStore for MemoryStore {
    fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        self.requests.lock().unwrap().push(request.clone());
        let index = Self::page_index(request.continuation_token.as_deref());
        if self.fail_at == Some(index) {
            return Err(anyhow!("connection reset while listing page {index}"));
        }
        let mut objects = self.pages.get(index).cloned().unwrap_or_default();
        if let Some(max) = request.max_keys {
            objects.truncate(max);
        }
        let next_continuation_token =
            (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(ListPage {
            objects,
            next_continuation_token,
        })
    }
}

/// Records every message; fails for one chosen object key.
#[derive(Default)]
pub struct RecordingPublisher {
    fail_key: Option<String>,
    pub messages: Mutex<Vec<(String, String)>>,
    pub calls: AtomicUsize,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(key: &str) -> Self {
        Self {
            fail_key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn published_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| object_key(m))
            .collect();
        keys.sort();
        keys
    }
}

pub fn object_key(message: &str) -> String {
    let v: serde_json::Value = serde_json::from_str(message).unwrap();
    v["Records"][0]["s3"]["object"]["key"]
        .as_str()
        .unwrap()
        .to_string()
}

impl Publisher for RecordingPublisher {
    fn publish(&self, topic_arn: &str, message: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_key.as_deref() == Some(object_key(message).as_str()) {
            return Err(anyhow!("AuthorizationError: not allowed to publish"));
        }
        self.messages
            .lock()
            .unwrap()
            .push((topic_arn.to_string(), message.to_string()));
        Ok(())
    }
}

/// Blocks every publish until the gate's sender is dropped.
pub struct GatedPublisher {
    pub gate: Receiver<()>,
}

impl Publisher for GatedPublisher {
    fn publish(&self, _topic_arn: &str, _message: &str) -> Result<()> {
        let _ = self.gate.recv();
        Ok(())
    }
}

/// Fixed answers for region/account lookups, counting how often it was asked.
#[derive(Default)]
pub struct FakeCloud {
    pub default_region: Option<String>,
    pub bucket_region: String,
    pub account: String,
    pub lookups: AtomicUsize,
    /// Region each lookup was sent through, in call order.
    pub lookup_regions: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            default_region: Some("eu-west-1".to_string()),
            bucket_region: "us-west-2".to_string(),
            account: "111122223333".to_string(),
            lookups: AtomicUsize::new(0),
            lookup_regions: Mutex::new(Vec::new()),
        }
    }
}

impl FakeCloud {
    fn record_lookup(&self, region: &str) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.lookup_regions.lock().unwrap().push(region.to_string());
    }
}

impl CloudContext for FakeCloud {
    fn default_region(&self) -> Option<String> {
        self.default_region.clone()
    }

    fn bucket_region(&self, _bucket: &str, region: &str) -> Result<String> {
        self.record_lookup(region);
        Ok(self.bucket_region.clone())
    }

    fn caller_account(&self, region: &str) -> Result<String> {
        self.record_lookup(region);
        Ok(self.account.clone())
    }
}
