//! Application configuration constants.
//! Tuning, defaults and exit codes in one place.

use std::fmt;
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    /// Config file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Upper-cased package name for log banners (e.g. `S3REPLAY`).
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }
}

// ---- Defaults ----

/// Defaults applied before the config file and CLI.
pub struct Defaults;

impl Defaults {
    /// Topic the log processor subscribes to for new-data notifications.
    pub const TOPIC: &'static str = "panther-processed-data-notifications";
    /// Publish workers. Publishing is network bound, so this is well above core count.
    pub const CONCURRENCY: usize = 50;
}

// ---- Pipeline ----

/// Work queue sizing between the lister and the publish workers.
pub struct PipelineConsts;

impl PipelineConsts {
    /// Queue slots per worker. Enough to keep workers busy across a page boundary.
    pub const QUEUE_DEPTH_PER_WORKER: usize = 4;
    /// Floor for the queue capacity at low concurrency.
    pub const MIN_QUEUE_CAP: usize = 16;

    pub fn queue_cap(concurrency: usize) -> usize {
        concurrency
            .saturating_mul(Self::QUEUE_DEPTH_PER_WORKER)
            .max(Self::MIN_QUEUE_CAP)
    }
}

// ---- Listing ----

pub struct ListingConsts;

impl ListingConsts {
    /// ListObjectsV2 hard cap on keys per page.
    pub const MAX_KEYS_PER_PAGE: usize = 1000;
}

// ---- AWS / event shape ----

pub struct AwsConsts;

impl AwsConsts {
    pub const PARTITION: &'static str = "aws";
    /// GetBucketLocation returns no constraint for buckets in this region.
    pub const DEFAULT_BUCKET_REGION: &'static str = "us-east-1";
    pub const EVENT_VERSION: &'static str = "2.1";
    pub const EVENT_SOURCE: &'static str = "aws:s3";
    pub const EVENT_NAME: &'static str = "ObjectCreated:Put";
    pub const S3_SCHEMA_VERSION: &'static str = "1.0";
}

// ---- Exit codes ----

pub struct ExitCodes;

impl ExitCodes {
    pub const RUN_FAILED: u8 = 1;
    /// Bad or missing flags; nothing remote was contacted.
    pub const USAGE: u8 = 2;
    /// 128 + SIGINT.
    pub const INTERRUPTED: i32 = 130;
}

// ---- Errors ----

/// Flag/config validation failure. `main` downcasts to this to pick [`ExitCodes::USAGE`].
#[derive(Debug)]
pub struct UsageError(String);

impl UsageError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}
