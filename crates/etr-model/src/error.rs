use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid run identifier: {0}")]
    InvalidRunHandle(String),
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}
