use async_trait::async_trait;
use etr_core::{LogService, ServiceError};
use etr_model::{LogLine, LogLocation};
use tracing::debug;

use crate::{convert, errors::AwsError};

/// Run output stored in CloudWatch Logs.
///
/// Reads a single page of events; long streams are truncated to what the first
/// response returns.
#[derive(Clone, Debug)]
pub struct CloudWatchLogService {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl CloudWatchLogService {
    pub fn new(client: aws_sdk_cloudwatchlogs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogService for CloudWatchLogService {
    async fn get_events(
        &self,
        location: &LogLocation,
        from_head: bool,
    ) -> Result<Vec<LogLine>, ServiceError> {
        debug!(group = %location.group, stream = %location.stream, "logs:GetLogEvents");
        let output = self
            .client
            .get_log_events()
            .log_group_name(&location.group)
            .log_stream_name(&location.stream)
            .start_from_head(from_head)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_resource_not_found_exception() {
                    AwsError::not_found("logs", location.to_string())
                } else {
                    AwsError::request("logs", err)
                }
            })?;
        Ok(output.events().iter().map(convert::log_line).collect())
    }
}
