use aws_config::{BehaviorVersion, SdkConfig};
use tracing::debug;

use crate::{CloudWatchLogService, EcsRunService, SsmTemplateStore};

/// Clients for every service the runner talks to, sharing one SDK configuration.
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub ssm: aws_sdk_ssm::Client,
    pub ecs: aws_sdk_ecs::Client,
    pub logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsClients {
    /// Resolve credentials and region from the default provider chain.
    pub async fn from_env() -> Self {
        let cfg = aws_config::load_defaults(BehaviorVersion::latest()).await;
        debug!(region = ?cfg.region(), "aws configuration loaded");
        Self::from_config(&cfg)
    }

    pub fn from_config(cfg: &SdkConfig) -> Self {
        Self {
            ssm: aws_sdk_ssm::Client::new(cfg),
            ecs: aws_sdk_ecs::Client::new(cfg),
            logs: aws_sdk_cloudwatchlogs::Client::new(cfg),
        }
    }

    pub fn template_store(&self) -> SsmTemplateStore {
        SsmTemplateStore::new(self.ssm.clone())
    }

    pub fn run_service(&self) -> EcsRunService {
        EcsRunService::new(self.ecs.clone())
    }

    pub fn log_service(&self) -> CloudWatchLogService {
        CloudWatchLogService::new(self.logs.clone())
    }
}
