//! Request-handling layer ↔ drafting core ↔ persistence layer messages

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::{
    ApiFailure, DocumentType, Priority, ProviderConfig, ProviderId, TokenUsage, ValidationStatus,
};

/// A drafting request as handed over by the request-handling layer
///
/// `metadata` is an ordered bag so that anything derived from it (prompts in
/// particular) is reproducible byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub document_type: DocumentType,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl GenerationRequest {
    pub fn new(document_type: DocumentType, subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            document_type,
            subject: subject.into(),
            content: content.into(),
            priority: Priority::Normal,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Metadata value as trimmed text, `None` when absent, null or blank
    pub fn metadata_text(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            Value::Null => None,
            Value::String(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Array(items) if items.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    /// True when the key carries a usable (non-null, non-blank) value
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata_text(key).is_some()
    }
}

/// Outcome of a single provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// One provider call, retries included, in the order it was made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: ProviderId,
    pub model: String,
    /// 1-based call number against this provider
    pub attempt: u32,
    pub outcome: AttemptOutcome,
    pub latency_ms: u64,
    pub failure: Option<ApiFailure>,
}

impl ProviderAttempt {
    pub fn success(config: &ProviderConfig, attempt: u32, latency_ms: u64) -> Self {
        Self {
            provider: config.provider,
            model: config.model.clone(),
            attempt,
            outcome: AttemptOutcome::Success,
            latency_ms,
            failure: None,
        }
    }

    pub fn failure(config: &ProviderConfig, attempt: u32, latency_ms: u64, failure: ApiFailure) -> Self {
        Self {
            provider: config.provider,
            model: config.model.clone(),
            attempt,
            outcome: AttemptOutcome::Failure,
            latency_ms,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

/// Structural validation details attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    /// Required sections with no recognisable marker in the text
    pub missing_sections: Vec<String>,
    /// Provider stopped on its output-token limit
    pub truncated: bool,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.status == ValidationStatus::Complete
    }
}

/// Finished draft plus audit metadata, handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub document_type: DocumentType,
    pub subject: String,
    pub priority: Priority,
    pub text: String,
    pub provider: ProviderId,
    pub model: String,
    pub attempts: Vec<ProviderAttempt>,
    pub tokens: TokenUsage,
    /// USD estimate, not billed ground truth
    pub estimated_cost: f64,
    pub validation: ValidationReport,
}
