use std::sync::Arc;

use etr_model::{RunHandle, SINGLE_CONTAINER_ASSUMPTION, TaskTemplate};
use tracing::{info, instrument};

use crate::{
    error::CoreError,
    ports::{ContainerOverride, RunRequest, RunService},
};

/// Creates exactly one run per call.
///
/// Submitting launches real compute, so nothing here retries.
pub struct TaskSubmitter {
    runs: Arc<dyn RunService>,
    container_name: String,
}

impl TaskSubmitter {
    pub fn new(runs: Arc<dyn RunService>, container_name: impl Into<String>) -> Self {
        Self {
            runs,
            container_name: container_name.into(),
        }
    }

    pub fn request_for(&self, template: &TaskTemplate) -> RunRequest {
        RunRequest {
            cluster: template.cluster.clone(),
            task_definition: template.task_definition_arn.clone(),
            subnets: template.subnet_ids.clone(),
            security_groups: template.security_group_ids.clone(),
            container_override: ContainerOverride {
                name: self.container_name.clone(),
                command: template.effective_command().map(<[String]>::to_vec),
            },
        }
    }

    #[instrument(level = "debug", skip_all, fields(cluster = %template.cluster))]
    pub async fn submit(&self, template: &TaskTemplate) -> Result<RunHandle, CoreError> {
        let request = self.request_for(template);
        let result = self
            .runs
            .run_task(&request)
            .await
            .map_err(CoreError::Submission)?;

        let Some(run) = result.runs.get(SINGLE_CONTAINER_ASSUMPTION) else {
            let reason = result
                .failures
                .first()
                .map(|f| f.describe())
                .unwrap_or_else(|| "no failure reported".to_string());
            return Err(CoreError::SubmissionIncomplete(format!(
                "response contains no tasks ({reason})"
            )));
        };
        let arn = run.arn.as_deref().ok_or_else(|| {
            CoreError::SubmissionIncomplete("response contains no task ARN".to_string())
        })?;
        let handle = RunHandle::parse(arn)
            .map_err(|e| CoreError::SubmissionIncomplete(e.to_string()))?;

        info!(run = %handle, "task submitted");
        Ok(handle)
    }
}
