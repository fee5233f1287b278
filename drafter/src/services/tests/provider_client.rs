//! Tests for HttpProviderClient response parsing and status mapping

use std::collections::HashMap;

use serde_json::json;
use shared::{ApiFailure, ProviderConfig, ProviderId, TokenUsage};

use crate::services::provider_client::{
    map_status, parse_anthropic, parse_gemini, parse_openai, HttpProviderClient,
};
use crate::traits::ProviderClient;
use crate::types::Prompt;

#[test]
fn test_parse_openai_completion() {
    let body = json!({
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "message": { "role": "assistant", "content": "Subject: Budget review" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 812, "completion_tokens": 240, "total_tokens": 1052 }
    });

    let response = parse_openai(&body, "gpt-4o").unwrap();

    assert_eq!(response.text, "Subject: Budget review");
    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.usage, Some(TokenUsage { input_tokens: 812, output_tokens: 240 }));
    assert!(!response.truncated);
}

#[test]
fn test_parse_openai_length_stop_is_truncated() {
    let body = json!({
        "choices": [{ "message": { "content": "Reference No.:" }, "finish_reason": "length" }]
    });

    let response = parse_openai(&body, "gpt-4o").unwrap();

    assert!(response.truncated);
    assert_eq!(response.usage, None);
    assert_eq!(response.model, "gpt-4o");
}

#[test]
fn test_parse_anthropic_joins_text_blocks() {
    let body = json!({
        "model": "claude-sonnet-4-20250514",
        "content": [
            { "type": "text", "text": "MINUTES OF MEETING\n" },
            { "type": "text", "text": "Attendance:" }
        ],
        "stop_reason": "max_tokens",
        "usage": { "input_tokens": 1500, "output_tokens": 4000 }
    });

    let response = parse_anthropic(&body, "claude").unwrap();

    assert_eq!(response.text, "MINUTES OF MEETING\nAttendance:");
    assert!(response.truncated);
    assert_eq!(response.usage.map(|u| u.total()), Some(5500));
}

#[test]
fn test_parse_gemini_blocked_candidate_is_empty() {
    let body = json!({
        "candidates": [{ "finishReason": "SAFETY" }],
        "usageMetadata": { "promptTokenCount": 90 }
    });

    assert_eq!(parse_gemini(&body, "gemini-1.5-pro"), Err(ApiFailure::EmptyResponse));
}

#[test]
fn test_parse_gemini_completion() {
    let body = json!({
        "candidates": [{
            "content": { "parts": [{ "text": "NOTICE" }, { "text": "\nNo. 14" }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 30 }
    });

    let response = parse_gemini(&body, "gemini-1.5-pro").unwrap();

    assert_eq!(response.text, "NOTICE\nNo. 14");
    assert_eq!(response.usage, Some(TokenUsage { input_tokens: 120, output_tokens: 30 }));
}

#[test]
fn test_missing_choices_is_invalid_response() {
    let failure = parse_openai(&json!({ "error": "boom" }), "gpt-4o").unwrap_err();

    assert!(matches!(failure, ApiFailure::InvalidResponse(_)));
    assert!(failure.is_transient());
}

#[test]
fn test_status_mapping() {
    assert_eq!(map_status(401, "m"), ApiFailure::AuthenticationFailed);
    assert_eq!(map_status(403, "m"), ApiFailure::AuthenticationFailed);
    assert_eq!(map_status(404, "m"), ApiFailure::ModelNotFound("m".to_string()));
    assert_eq!(map_status(408, "m"), ApiFailure::NetworkTimeout);
    assert_eq!(map_status(429, "m"), ApiFailure::RateLimitExceeded);
    assert_eq!(map_status(503, "m"), ApiFailure::ServiceUnavailable);
    assert_eq!(map_status(529, "m"), ApiFailure::ServiceUnavailable);
    assert_eq!(map_status(500, "m"), ApiFailure::ServerError("500".to_string()));
    assert!(matches!(map_status(400, "m"), ApiFailure::InvalidRequest(_)));

    assert!(!map_status(401, "m").is_transient());
    assert!(!map_status(422, "m").is_transient());
    assert!(map_status(502, "m").is_transient());
}

#[tokio::test]
async fn test_missing_key_fails_without_network() {
    let client = HttpProviderClient::new(HashMap::from([(ProviderId::OpenAI, "sk-test".to_string())]));
    let config = ProviderConfig::with_default_model(ProviderId::Anthropic);

    let failure = client
        .invoke(&Prompt::new("s", "u"), &config)
        .await
        .unwrap_err();

    assert_eq!(failure, ApiFailure::MissingApiKey);
    assert!(client.has_key(ProviderId::OpenAI));
    assert!(!client.has_key(ProviderId::Anthropic));
}
