//! Core types used throughout the drafting pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::SharedError;

/// Kinds of government correspondence the drafter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    OfficialLetter,
    Email,
    MeetingMinutes,
    Memo,
    Circular,
    Notice,
}

impl DocumentType {
    /// Every document type, in catalogue order
    pub const ALL: [DocumentType; 6] = [
        DocumentType::OfficialLetter,
        DocumentType::Email,
        DocumentType::MeetingMinutes,
        DocumentType::Memo,
        DocumentType::Circular,
        DocumentType::Notice,
    ];

    /// Stable snake_case identifier
    pub fn id(&self) -> &'static str {
        match self {
            DocumentType::OfficialLetter => "official_letter",
            DocumentType::Email => "email",
            DocumentType::MeetingMinutes => "meeting_minutes",
            DocumentType::Memo => "memo",
            DocumentType::Circular => "circular",
            DocumentType::Notice => "notice",
        }
    }

    /// Human readable name ("official letter")
    pub fn label(&self) -> String {
        self.id().replace('_', " ")
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for DocumentType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        DocumentType::ALL
            .into_iter()
            .find(|doc_type| doc_type.id() == normalized)
            .ok_or_else(|| SharedError::InvalidValue {
                kind: "document type".to_string(),
                value: s.to_string(),
            })
    }
}

/// Handling priority attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for Priority {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(SharedError::InvalidValue {
                kind: "priority".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// LLM providers available to the drafter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Anthropic,
    Gemini,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::OpenAI => write!(f, "openai"),
            ProviderId::Anthropic => write!(f, "anthropic"),
            ProviderId::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAI),
            "anthropic" | "claude" => Ok(ProviderId::Anthropic),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            _ => Err(SharedError::InvalidValue {
                kind: "provider".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Token usage information for LLM requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// One entry of the provider priority list: which provider, which model, and
/// the parameters sent with every call to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_ms: u64,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 4000,
            temperature: 0.3,
            request_timeout_ms: 30_000,
        }
    }

    pub fn with_default_model(provider: ProviderId) -> Self {
        let model = match provider {
            ProviderId::OpenAI => "gpt-4o",
            ProviderId::Anthropic => "claude-sonnet-4-20250514",
            ProviderId::Gemini => "gemini-1.5-pro",
        };
        Self::new(provider, model)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// API failure types for error handling at the provider boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiFailure {
    RateLimitExceeded,
    NetworkTimeout,
    ServiceUnavailable,
    ServerError(String),
    NetworkError(String),
    InvalidResponse(String),
    EmptyResponse,
    AuthenticationFailed,
    MissingApiKey,
    InvalidRequest(String),
    ModelNotFound(String),
    /// The overall generation budget ran out while this call was in flight
    Cancelled,
}

impl ApiFailure {
    /// Transient failures are worth retrying against the same provider
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiFailure::RateLimitExceeded
                | ApiFailure::NetworkTimeout
                | ApiFailure::ServiceUnavailable
                | ApiFailure::ServerError(_)
                | ApiFailure::NetworkError(_)
                | ApiFailure::InvalidResponse(_)
                | ApiFailure::EmptyResponse
        )
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::RateLimitExceeded => write!(f, "rate limit exceeded"),
            ApiFailure::NetworkTimeout => write!(f, "request timed out"),
            ApiFailure::ServiceUnavailable => write!(f, "service unavailable"),
            ApiFailure::ServerError(status) => write!(f, "server error: {status}"),
            ApiFailure::NetworkError(message) => write!(f, "network error: {message}"),
            ApiFailure::InvalidResponse(message) => write!(f, "invalid response: {message}"),
            ApiFailure::EmptyResponse => write!(f, "empty completion"),
            ApiFailure::AuthenticationFailed => write!(f, "authentication failed"),
            ApiFailure::MissingApiKey => write!(f, "no API key configured"),
            ApiFailure::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            ApiFailure::ModelNotFound(model) => write!(f, "model not found: {model}"),
            ApiFailure::Cancelled => write!(f, "cancelled: generation budget exhausted"),
        }
    }
}

/// Structural validation verdict for generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Complete,
    /// Text kept but flagged for human review
    Partial,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Complete => write!(f, "COMPLETE"),
            ValidationStatus::Partial => write!(f, "PARTIAL"),
        }
    }
}
