use std::sync::Arc;

use etr_model::TaskTemplate;
use tracing::{debug, instrument};

use crate::{
    error::{CoreError, ServiceError},
    ports::TemplateStore,
};

/// Loads task templates from the parameter store.
pub struct TemplateResolver {
    store: Arc<dyn TemplateStore>,
}

impl TemplateResolver {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, key: &str) -> Result<TaskTemplate, CoreError> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) | Err(ServiceError::NotFound(_)) => {
                return Err(CoreError::ConfigNotFound(key.to_string()));
            }
            Err(source) => {
                return Err(CoreError::ConfigFetch {
                    key: key.to_string(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Err(CoreError::ConfigNotFound(key.to_string()));
        }

        let template: TaskTemplate =
            serde_json::from_str(&raw).map_err(|e| CoreError::ConfigMalformed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!(cluster = %template.cluster, task_definition = %template.task_definition_arn, "template resolved");
        Ok(template)
    }
}
