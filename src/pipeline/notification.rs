//! S3 "ObjectCreated" event encoding.
//!
//! The log processor subscribes to the topic expecting the same JSON S3 sends for native bucket
//! notifications, so field names and casing follow that schema. Only the fields we can fill
//! deterministically from a listing are emitted (no `eventTime`, `eTag`, `sequencer`).
//!
//! Unlike native S3 events, `object.key` is the raw key, not form-URL-encoded. The log processor
//! reads it as-is; a consumer that decodes keys would misread ones containing `+` or `%`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::utils::config::AwsConsts;
use crate::{ObjectDescriptor, RunConfig};

#[derive(Debug, Serialize)]
pub struct S3EventNotification<'a> {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord<'a> {
    pub event_version: &'static str,
    pub event_source: &'static str,
    pub aws_region: &'a str,
    pub event_name: &'static str,
    pub s3: S3Entity<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Entity<'a> {
    #[serde(rename = "s3SchemaVersion")]
    pub schema_version: &'static str,
    pub bucket: S3Bucket<'a>,
    pub object: S3Object<'a>,
}

#[derive(Debug, Serialize)]
pub struct S3Bucket<'a> {
    pub name: &'a str,
    pub arn: String,
}

#[derive(Debug, Serialize)]
pub struct S3Object<'a> {
    pub key: &'a str,
    pub size: u64,
}

/// Build the event for `object` (borrowed; nothing is copied but the bucket ARN).
pub fn build_notification<'a>(
    object: &'a ObjectDescriptor,
    config: &'a RunConfig,
) -> S3EventNotification<'a> {
    S3EventNotification {
        records: vec![S3EventRecord {
            event_version: AwsConsts::EVENT_VERSION,
            event_source: AwsConsts::EVENT_SOURCE,
            aws_region: &config.source_region,
            event_name: AwsConsts::EVENT_NAME,
            s3: S3Entity {
                schema_version: AwsConsts::S3_SCHEMA_VERSION,
                bucket: S3Bucket {
                    name: &config.source.bucket,
                    arn: config.source.bucket_arn(),
                },
                object: S3Object {
                    key: &object.key,
                    size: object.size,
                },
            },
        }],
    }
}

/// Serialize the event for `object` to the message body published on the topic.
/// Same input, same bytes.
pub fn encode_notification(object: &ObjectDescriptor, config: &RunConfig) -> Result<String> {
    serde_json::to_string(&build_notification(object, config))
        .with_context(|| format!("encode notification for {}", object.key))
}
