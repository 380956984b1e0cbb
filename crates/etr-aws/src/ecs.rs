use async_trait::async_trait;
use aws_sdk_ecs::types::LaunchType;
use etr_core::{RunRequest, RunService, RunTaskResult, ServiceError};
use etr_model::{TaskDefinition, TerminalSnapshot};
use tracing::debug;

use crate::{convert, errors::AwsError};

/// Runs are always placed on Fargate.
pub const LAUNCH_TYPE: LaunchType = LaunchType::Fargate;

/// Run lifecycle backed by the ECS API.
#[derive(Clone, Debug)]
pub struct EcsRunService {
    client: aws_sdk_ecs::Client,
}

impl EcsRunService {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RunService for EcsRunService {
    async fn run_task(&self, request: &RunRequest) -> Result<RunTaskResult, ServiceError> {
        debug!(
            cluster = %request.cluster,
            task_definition = %request.task_definition,
            "ecs:RunTask"
        );
        let output = self
            .client
            .run_task()
            .cluster(&request.cluster)
            .task_definition(&request.task_definition)
            .launch_type(LAUNCH_TYPE)
            .network_configuration(convert::network_configuration(request)?)
            .overrides(convert::task_override(request))
            .send()
            .await
            .map_err(|e| AwsError::request("ecs", e))?;
        Ok(convert::run_task_result(output.tasks(), output.failures()))
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        run_ids: &[String],
    ) -> Result<TerminalSnapshot, ServiceError> {
        debug!(cluster, runs = ?run_ids, "ecs:DescribeTasks");
        let output = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(run_ids.to_vec()))
            .send()
            .await
            .map_err(|e| AwsError::request("ecs", e))?;
        Ok(convert::snapshot(output.tasks(), output.failures()))
    }

    async fn describe_task_definition(&self, arn: &str) -> Result<TaskDefinition, ServiceError> {
        debug!(task_definition = arn, "ecs:DescribeTaskDefinition");
        let output = self
            .client
            .describe_task_definition()
            .task_definition(arn)
            .send()
            .await
            .map_err(|e| AwsError::request("ecs", e))?;
        let definition = output
            .task_definition()
            .ok_or_else(|| AwsError::not_found("ecs", format!("task definition {arn}")))?;
        Ok(convert::task_definition(arn, definition))
    }
}
