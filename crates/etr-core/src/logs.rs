use etr_model::{
    LOG_GROUP_OPTION, LogLine, LogLocation, RunHandle, STREAM_PREFIX_OPTION, TaskDefinition,
};
use tracing::debug;

use crate::{error::CoreError, ports::LogService};

/// Derive where the run's console output lives.
///
/// Uses the application container's `awslogs` options; the stream name is
/// `prefix/container-name/run-id`.
pub fn locate_logs(definition: &TaskDefinition, handle: &RunHandle) -> Result<LogLocation, CoreError> {
    let not_configured = || CoreError::LoggingNotConfigured(definition.arn.clone());

    let container = definition.primary_container().ok_or_else(not_configured)?;
    let group = container.log_option(LOG_GROUP_OPTION).ok_or_else(not_configured)?;
    let prefix = container
        .log_option(STREAM_PREFIX_OPTION)
        .ok_or_else(not_configured)?;

    Ok(LogLocation::new(group, prefix, &container.name, handle.run_id()))
}

/// Retrieve the stream from its earliest retained event.
pub async fn fetch_logs(
    logs: &dyn LogService,
    location: &LogLocation,
) -> Result<Vec<LogLine>, CoreError> {
    let lines = logs
        .get_events(location, true)
        .await
        .map_err(CoreError::LogRetrieval)?;
    debug!(%location, count = lines.len(), "log events retrieved");
    Ok(lines)
}
