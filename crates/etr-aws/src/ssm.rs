use async_trait::async_trait;
use etr_core::{ServiceError, TemplateStore};
use tracing::debug;

use crate::errors::AwsError;

/// Task templates stored in SSM Parameter Store.
#[derive(Clone, Debug)]
pub struct SsmTemplateStore {
    client: aws_sdk_ssm::Client,
}

impl SsmTemplateStore {
    pub fn new(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TemplateStore for SsmTemplateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        debug!(parameter = key, "ssm:GetParameter");
        match self.client.get_parameter().name(key).send().await {
            Ok(output) => Ok(output
                .parameter()
                .and_then(|p| p.value())
                .map(str::to_string)),
            Err(err) => {
                let err = err.into_service_error();
                if err.is_parameter_not_found() {
                    return Ok(None);
                }
                Err(AwsError::request("ssm", err).into())
            }
        }
    }
}
