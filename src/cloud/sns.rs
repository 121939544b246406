use anyhow::Result;

use super::{AwsContext, Publisher};

/// SNS Publish over a region-pinned client. One attempt per message; the SDK's own
/// transport retry settings are left at their defaults.
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    aws: AwsContext,
}

impl SnsPublisher {
    pub fn new(client: aws_sdk_sns::Client, aws: AwsContext) -> Self {
        Self { client, aws }
    }
}

impl Publisher for SnsPublisher {
    fn publish(&self, topic_arn: &str, message: &str) -> Result<()> {
        let call = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message);
        self.aws.block_on(call.send())?;
        Ok(())
    }
}
