//! Cloud seams: the three remote capabilities the pipeline needs, and their AWS implementations.
//!
//! The pipeline only talks to [`ObjectStore`], [`Publisher`] and [`CloudContext`]. Tests plug in
//! in-memory fakes; the binary uses [`AwsContext`] and the S3/SNS clients it hands out.

pub mod context;
pub mod s3;
pub mod sns;

pub use context::AwsContext;
pub use s3::S3ObjectStore;
pub use sns::SnsPublisher;

use anyhow::Result;

use crate::ObjectDescriptor;

/// One ListObjectsV2-style page request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub bucket: String,
    pub prefix: String,
    /// Token from the previous page; None for the first page.
    pub continuation_token: Option<String>,
    /// Page size hint. None lets the store pick (1000 for S3).
    pub max_keys: Option<usize>,
}

/// One page of listing results.
#[derive(Clone, Debug, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectDescriptor>,
    /// Present when more pages follow.
    pub next_continuation_token: Option<String>,
}

/// Paginated, read-only object listing.
pub trait ObjectStore: Send + Sync {
    fn list_page(&self, request: &ListRequest) -> Result<ListPage>;
}

/// Publish one message to a topic. No partial success: Ok means the topic accepted it.
pub trait Publisher: Send + Sync {
    fn publish(&self, topic_arn: &str, message: &str) -> Result<()>;
}

/// Lookups used once, before a run starts, to fill in [`RunConfig`](crate::RunConfig).
pub trait CloudContext {
    /// Region from the environment/profile, if any.
    fn default_region(&self) -> Option<String>;
    /// Region the bucket lives in, asked through an endpoint in `region`.
    fn bucket_region(&self, bucket: &str, region: &str) -> Result<String>;
    /// Account id of the current credentials, asked through an endpoint in `region`.
    fn caller_account(&self, region: &str) -> Result<String>;
}
