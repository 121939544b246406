//! Shared AWS session: one SDK config and one tokio runtime for every client in the process.
//!
//! The pipeline runs on plain threads. SDK calls are async, so each adapter blocks on the shared
//! runtime for the duration of a single request.

use anyhow::{Context, Result, anyhow};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::future::Future;
use std::sync::Arc;

use crate::utils::config::AwsConsts;

use super::{CloudContext, S3ObjectStore, SnsPublisher};

/// Loaded AWS config plus the runtime that drives SDK futures.
#[derive(Clone)]
pub struct AwsContext {
    runtime: Arc<tokio::runtime::Runtime>,
    sdk_config: SdkConfig,
}

impl AwsContext {
    /// Load credentials/region from the default provider chain (env, profile, IMDS, ...).
    pub fn load() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name(format!("{}-aws", env!("CARGO_PKG_NAME")))
            .build()
            .context("start tokio runtime for AWS SDK")?;
        let sdk_config = runtime.block_on(aws_config::defaults(BehaviorVersion::latest()).load());
        Ok(Self {
            runtime: Arc::new(runtime),
            sdk_config,
        })
    }

    /// Run one SDK future to completion from a non-async thread.
    pub(crate) fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    fn s3_client(&self, region: &str) -> aws_sdk_s3::Client {
        let conf = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_s3::Client::from_conf(conf)
    }

    /// S3 client pinned to `region` (listing must hit the bucket's own region).
    pub fn object_store(&self, region: &str) -> S3ObjectStore {
        S3ObjectStore::new(self.s3_client(region), self.clone())
    }

    /// SNS client pinned to `region` (the topic's region).
    pub fn publisher(&self, region: &str) -> SnsPublisher {
        let conf = aws_sdk_sns::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        SnsPublisher::new(aws_sdk_sns::Client::from_conf(conf), self.clone())
    }
}

impl CloudContext for AwsContext {
    fn default_region(&self) -> Option<String> {
        self.sdk_config.region().map(|r| r.to_string())
    }

    fn bucket_region(&self, bucket: &str, region: &str) -> Result<String> {
        let client = self.s3_client(region);
        let out = self
            .block_on(client.get_bucket_location().bucket(bucket).send())
            .with_context(|| format!("failed to find bucket region for {bucket}"))?;
        Ok(bucket_region_from_constraint(
            out.location_constraint().map(|c| c.as_str()),
        ))
    }

    fn caller_account(&self, region: &str) -> Result<String> {
        let conf = aws_sdk_sts::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        let client = aws_sdk_sts::Client::from_conf(conf);
        let identity = self
            .block_on(client.get_caller_identity().send())
            .context("failed to get caller identity")?;
        identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("caller identity has no account id"))
    }
}

/// GetBucketLocation reports no (or an empty) constraint for us-east-1.
pub fn bucket_region_from_constraint(constraint: Option<&str>) -> String {
    match constraint {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => AwsConsts::DEFAULT_BUCKET_REGION.to_string(),
    }
}
