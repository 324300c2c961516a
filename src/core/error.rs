use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BulkError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Row count mismatch: expected {expected}, found {actual}")]
    CountMismatch { expected: i64, actual: i64 },
}

impl From<std::io::Error> for BulkError {
    fn from(err: std::io::Error) -> Self {
        BulkError::IoError(err.to_string())
    }
}

impl From<sqlx::Error> for BulkError {
    fn from(err: sqlx::Error) -> Self {
        BulkError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for BulkError {
    fn from(err: serde_json::Error) -> Self {
        BulkError::SerializationError(err.to_string())
    }
}
