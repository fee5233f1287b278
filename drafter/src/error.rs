//! Drafter error types

use std::time::Duration;

use shared::{ProviderAttempt, SharedError};
use thiserror::Error;

/// Result type for drafter operations
pub type DrafterResult<T> = Result<T, DrafterError>;

/// Drafter error types
#[derive(Error, Debug)]
pub enum DrafterError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("All providers exhausted after {} attempts", .attempts.len())]
    AllProvidersExhausted { attempts: Vec<ProviderAttempt> },

    #[error("Generation budget of {budget:?} exceeded after {} attempts", .attempts.len())]
    Timeout { budget: Duration, attempts: Vec<ProviderAttempt> },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DrafterError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: "required field is missing or blank".to_string(),
        }
    }

    /// Provider attempt log carried by the error, empty for non-provider errors
    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            Self::AllProvidersExhausted { attempts } | Self::Timeout { attempts, .. } => attempts,
            _ => &[],
        }
    }

    /// Whether resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AllProvidersExhausted { .. } | Self::Timeout { .. })
    }
}
