use std::error::Error;

use aws_sdk_ecs::error::DisplayErrorContext;
use etr_core::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },

    #[error("{service} resource not found: {message}")]
    NotFound {
        service: &'static str,
        message: String,
    },

    #[error("invalid {service} request: {message}")]
    InvalidRequest {
        service: &'static str,
        message: String,
    },
}

impl AwsError {
    /// Wrap an SDK error, keeping its full source chain in the message.
    pub fn request<E: Error>(service: &'static str, err: E) -> Self {
        AwsError::Request {
            service,
            message: DisplayErrorContext(err).to_string(),
        }
    }

    pub fn not_found(service: &'static str, message: impl Into<String>) -> Self {
        AwsError::NotFound {
            service,
            message: message.into(),
        }
    }
}

impl From<AwsError> for ServiceError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::NotFound { .. } => ServiceError::NotFound(err.to_string()),
            _ => ServiceError::Transport(err.to_string()),
        }
    }
}
