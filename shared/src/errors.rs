//! Shared error types for the drafting workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid {kind}: {value}")]
    InvalidValue { kind: String, value: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
