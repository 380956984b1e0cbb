//! Mapping between SDK shapes and the domain model.

use aws_sdk_cloudwatchlogs::types::OutputLogEvent;
use aws_sdk_ecs::types::{
    AwsVpcConfiguration, Container, ContainerDefinition as EcsContainerDefinition,
    ContainerOverride as EcsContainerOverride, Failure, NetworkConfiguration, Task,
    TaskDefinition as EcsTaskDefinition, TaskOverride,
};
use etr_core::{RunRequest, RunTaskResult, SubmittedRun};
use etr_model::{
    ContainerDefinition, ContainerResult, LogLine, RunDescriptor, SchedulingFailure,
    TaskDefinition, TerminalSnapshot,
};

use crate::errors::AwsError;

pub(crate) fn network_configuration(
    request: &RunRequest,
) -> Result<NetworkConfiguration, AwsError> {
    let vpc = AwsVpcConfiguration::builder()
        .set_subnets(Some(request.subnets.clone()))
        .set_security_groups(Some(request.security_groups.clone()))
        .build()
        .map_err(|e| AwsError::InvalidRequest {
            service: "ecs",
            message: e.to_string(),
        })?;
    Ok(NetworkConfiguration::builder()
        .awsvpc_configuration(vpc)
        .build())
}

pub(crate) fn task_override(request: &RunRequest) -> TaskOverride {
    let container = EcsContainerOverride::builder()
        .name(request.container_override.name.clone())
        .set_command(request.container_override.command.clone())
        .build();
    TaskOverride::builder().container_overrides(container).build()
}

pub(crate) fn run_task_result(tasks: &[Task], failures: &[Failure]) -> RunTaskResult {
    RunTaskResult {
        runs: tasks
            .iter()
            .map(|t| SubmittedRun {
                arn: t.task_arn().map(str::to_string),
            })
            .collect(),
        failures: failures.iter().map(failure).collect(),
    }
}

pub(crate) fn snapshot(tasks: &[Task], failures: &[Failure]) -> TerminalSnapshot {
    TerminalSnapshot {
        tasks: tasks.iter().map(run_descriptor).collect(),
        failures: failures.iter().map(failure).collect(),
    }
}

fn run_descriptor(task: &Task) -> RunDescriptor {
    RunDescriptor {
        arn: task.task_arn().map(str::to_string),
        last_status: task.last_status().map(str::to_string),
        task_definition_arn: task.task_definition_arn().map(str::to_string),
        stopped_reason: task.stopped_reason().map(str::to_string),
        containers: task.containers().iter().map(container_result).collect(),
    }
}

fn container_result(container: &Container) -> ContainerResult {
    ContainerResult {
        name: container.name().unwrap_or_default().to_string(),
        exit_code: container.exit_code(),
        reason: container.reason().map(str::to_string),
    }
}

fn failure(failure: &Failure) -> SchedulingFailure {
    SchedulingFailure {
        arn: failure.arn().map(str::to_string),
        reason: failure.reason().map(str::to_string),
        detail: failure.detail().map(str::to_string),
    }
}

pub(crate) fn task_definition(requested: &str, definition: &EcsTaskDefinition) -> TaskDefinition {
    TaskDefinition {
        arn: definition
            .task_definition_arn()
            .unwrap_or(requested)
            .to_string(),
        containers: definition
            .container_definitions()
            .iter()
            .map(container_definition)
            .collect(),
    }
}

fn container_definition(definition: &EcsContainerDefinition) -> ContainerDefinition {
    ContainerDefinition {
        name: definition.name().unwrap_or_default().to_string(),
        log_options: definition
            .log_configuration()
            .and_then(|c| c.options())
            .cloned()
            .unwrap_or_default(),
    }
}

pub(crate) fn log_line(event: &OutputLogEvent) -> LogLine {
    LogLine {
        timestamp: event.timestamp(),
        ingestion_time: event.ingestion_time(),
        message: event.message().unwrap_or_default().to_string(),
    }
}
