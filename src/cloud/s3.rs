use anyhow::{Context, Result};

use crate::ObjectDescriptor;

use super::{AwsContext, ListPage, ListRequest, ObjectStore};

/// ListObjectsV2 over a region-pinned S3 client.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    aws: AwsContext,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, aws: AwsContext) -> Self {
        Self { client, aws }
    }
}

impl ObjectStore for S3ObjectStore {
    fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let call = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .prefix(&request.prefix)
            .set_continuation_token(request.continuation_token.clone())
            .set_max_keys(request.max_keys.map(|n| i32::try_from(n).unwrap_or(i32::MAX)));
        let out = self.aws.block_on(call.send()).with_context(|| {
            format!("ListObjectsV2 s3://{}/{}", request.bucket, request.prefix)
        })?;

        let objects = out
            .contents()
            .iter()
            .filter_map(|o| {
                let key = o.key()?;
                let size = o.size().unwrap_or(0).max(0) as u64;
                Some(ObjectDescriptor::new(key, size))
            })
            .collect();
        let next_continuation_token = match out.is_truncated() {
            Some(true) => out.next_continuation_token().map(str::to_string),
            _ => None,
        };
        Ok(ListPage {
            objects,
            next_continuation_token,
        })
    }
}
