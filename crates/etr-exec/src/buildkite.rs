use async_trait::async_trait;
use etr_core::{Annotation, AnnotationSink, ServiceError};
use tracing::info;

use crate::proc::{ProcConfig, run_to_completion};

pub const AGENT_PROGRAM: &str = "buildkite-agent";

/// Posts annotations through the `buildkite-agent` CLI.
#[derive(Clone, Debug)]
pub struct BuildkiteAgent {
    program: String,
}

impl Default for BuildkiteAgent {
    fn default() -> Self {
        Self::new(AGENT_PROGRAM)
    }
}

impl BuildkiteAgent {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `buildkite-agent annotate --style <style> --context <context>`, message on stdin.
    pub fn annotate_command(&self, annotation: &Annotation) -> ProcConfig {
        ProcConfig {
            program: self.program.clone(),
            args: vec![
                "annotate".to_string(),
                "--style".to_string(),
                annotation.style.as_str().to_string(),
                "--context".to_string(),
                annotation.context.clone(),
            ],
            stdin: Some(annotation.message.clone()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AnnotationSink for BuildkiteAgent {
    async fn annotate(&self, annotation: &Annotation) -> Result<(), ServiceError> {
        let cmd = self.annotate_command(annotation);
        info!(target: "etr.exec.buildkite", "Executing: {} {}", cmd.program, cmd.args.join(" "));
        run_to_completion(&cmd)
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }
}
