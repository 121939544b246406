//! Public and internal types for the s3replay API and pipeline.

use std::fmt;
use std::time::Duration;

use anyhow::Result;

use crate::utils::config::{AwsConsts, UsageError};

/// One listed object to replay. Dirs/folder markers never make it this far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub key: String,
    pub size: u64,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Zero-byte key ending in `/` (created by the S3 console for "folders").
    pub fn is_folder_marker(&self) -> bool {
        self.size == 0 && self.key.ends_with('/')
    }
}

/// Bucket + key prefix parsed from `s3://<bucket>/<prefix>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Path {
    pub bucket: String,
    pub prefix: String,
}

impl S3Path {
    /// Parse `s3://bucket/prefix`. The prefix may be empty; the bucket may not.
    pub fn parse(s: &str) -> Result<Self> {
        let rest = s.trim().strip_prefix("s3://").ok_or_else(|| {
            UsageError::new(format!(
                "not an s3 path (expected s3://<bucket>/<prefix>): {s}"
            ))
        })?;
        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(UsageError::new(format!("missing bucket in s3 path: {s}")).into());
        }
        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }

    pub fn bucket_arn(&self) -> String {
        format!("arn:aws:s3:::{}", self.bucket)
    }
}

impl fmt::Display for S3Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}

/// Everything a run needs, resolved once before the pipeline starts. Never mutated during a run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Account that owns the topic.
    pub account_id: String,
    /// Where to list objects.
    pub source: S3Path,
    /// Region the bucket lives in (goes into each event's `awsRegion`).
    pub source_region: String,
    /// Topic name (not ARN).
    pub topic: String,
    /// Region the topic lives in.
    pub topic_region: String,
    /// Number of publish workers. Always >= 1.
    pub concurrency: usize,
    /// Stop after this many objects. `None` means all of them.
    pub limit: Option<u64>,
}

impl RunConfig {
    pub fn topic_arn(&self) -> String {
        format!(
            "arn:{}:sns:{}:{}:{}",
            AwsConsts::PARTITION,
            self.topic_region,
            self.account_id,
            self.topic
        )
    }
}

/// Options as gathered from defaults, config file and CLI, before any cloud lookups.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Topic region override. When None, the SDK default region is used.
    pub region: Option<String>,
    /// Account override. When None, resolved from the caller identity.
    pub account: Option<String>,
    /// Source path, `s3://bucket/prefix`.
    pub s3_path: Option<String>,
    pub topic: Option<String>,
    pub concurrency: usize,
    /// 0 = no limit.
    pub limit: u64,
    /// Prompt for missing required values.
    pub interactive: bool,
    /// Debug logging + progress counter.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        use crate::utils::config::Defaults;
        Self {
            region: None,
            account: None,
            s3_path: None,
            topic: Some(Defaults::TOPIC.to_string()),
            concurrency: Defaults::CONCURRENCY,
            limit: 0,
            interactive: true,
            verbose: false,
        }
    }
}

/// Point-in-time copy of the run counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub files_processed: u64,
    pub bytes_processed: u64,
}

impl StatsSnapshot {
    pub fn megabytes(&self) -> f64 {
        self.bytes_processed as f64 / (1024.0 * 1024.0)
    }
}

/// Stats and wall time at the moment a run was reported.
#[derive(Clone, Copy, Debug)]
pub struct RunReport {
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

/// How a run ended when it did not fail.
#[derive(Clone, Copy, Debug)]
pub enum RunOutcome {
    /// Every listed object was published.
    Completed(RunReport),
    /// A termination signal arrived; in-flight work was abandoned.
    Interrupted(RunReport),
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Completed(r) | RunOutcome::Interrupted(r) => r,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, RunOutcome::Interrupted(_))
    }
}
