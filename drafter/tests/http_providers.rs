//! HttpProviderClient against a mock HTTP server
//!
//! Verifies request shape per provider and the status-to-failure mapping.

use std::collections::HashMap;
use std::time::Duration;

use drafter::{HttpProviderClient, Prompt, ProviderClient};
use serde_json::json;
use shared::{ApiFailure, ProviderConfig, ProviderId, TokenUsage};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prompt() -> Prompt {
    Prompt::new("You draft official letters.", "Generate an official letter with the following details:")
}

fn client_for(provider: ProviderId, server: &MockServer) -> HttpProviderClient {
    HttpProviderClient::new(HashMap::from([(provider, "test-key".to_string())]))
        .with_base_url(provider, server.uri())
}

#[tokio::test]
async fn test_anthropic_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 4000,
            "system": "You draft official letters."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "claude-sonnet-4-20250514",
            "content": [{ "type": "text", "text": "Reference No.: 1" }],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 40, "output_tokens": 6 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::with_default_model(ProviderId::Anthropic);
    let response = client_for(ProviderId::Anthropic, &server)
        .invoke(&prompt(), &config)
        .await
        .unwrap();

    assert_eq!(response.text, "Reference No.: 1");
    assert_eq!(response.usage, Some(TokenUsage { input_tokens: 40, output_tokens: 6 }));
    assert!(!response.truncated);
}

#[tokio::test]
async fn test_openai_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [
                { "role": "system", "content": "You draft official letters." },
                { "role": "user", "content": "Generate an official letter with the following details:" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Subject: Test" }, "finish_reason": "length" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::with_default_model(ProviderId::OpenAI);
    let response = client_for(ProviderId::OpenAI, &server)
        .invoke(&prompt(), &config)
        .await
        .unwrap();

    assert_eq!(response.text, "Subject: Test");
    assert!(response.truncated);
}

#[tokio::test]
async fn test_gemini_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You draft official letters." }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "NOTICE" }] }, "finishReason": "STOP" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ProviderConfig::with_default_model(ProviderId::Gemini);
    let response = client_for(ProviderId::Gemini, &server)
        .invoke(&prompt(), &config)
        .await
        .unwrap();

    assert_eq!(response.text, "NOTICE");
    assert_eq!(response.model, "gemini-1.5-pro");
}

#[tokio::test]
async fn test_status_codes_map_to_failures() {
    let cases = [
        (401, ApiFailure::AuthenticationFailed),
        (404, ApiFailure::ModelNotFound("gpt-4o".to_string())),
        (429, ApiFailure::RateLimitExceeded),
        (503, ApiFailure::ServiceUnavailable),
        (500, ApiFailure::ServerError("500".to_string())),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let config = ProviderConfig::with_default_model(ProviderId::OpenAI);
        let failure = client_for(ProviderId::OpenAI, &server)
            .invoke(&prompt(), &config)
            .await
            .unwrap_err();

        assert_eq!(failure, expected, "status {status}");
    }
}

#[tokio::test]
async fn test_unparsable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let config = ProviderConfig::with_default_model(ProviderId::Anthropic);
    let failure = client_for(ProviderId::Anthropic, &server)
        .invoke(&prompt(), &config)
        .await
        .unwrap_err();

    assert!(matches!(failure, ApiFailure::InvalidResponse(_)));
    assert!(failure.is_transient());
}

#[tokio::test]
async fn test_slow_server_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ProviderConfig::with_default_model(ProviderId::OpenAI)
        .with_request_timeout(Duration::from_millis(100));
    let failure = client_for(ProviderId::OpenAI, &server)
        .invoke(&prompt(), &config)
        .await
        .unwrap_err();

    assert_eq!(failure, ApiFailure::NetworkTimeout);
}
