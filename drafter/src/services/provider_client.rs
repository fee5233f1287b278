//! HTTP provider client for OpenAI, Anthropic and Gemini

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{ApiFailure, ProviderConfig, ProviderId, TokenUsage};
use tracing::debug;

use crate::traits::ProviderClient;
use crate::types::{Prompt, RawResponse};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Real provider client; one HTTP request per `invoke`
#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    client: reqwest::Client,
    api_keys: HashMap<ProviderId, String>,
    base_urls: HashMap<ProviderId, String>,
}

impl HttpProviderClient {
    pub fn new(api_keys: HashMap<ProviderId, String>) -> Self {
        let base_urls = HashMap::from([
            (ProviderId::OpenAI, OPENAI_BASE_URL.to_string()),
            (ProviderId::Anthropic, ANTHROPIC_BASE_URL.to_string()),
            (ProviderId::Gemini, GEMINI_BASE_URL.to_string()),
        ]);

        Self {
            client: reqwest::Client::new(),
            api_keys,
            base_urls,
        }
    }

    /// Point one provider at another host (mock servers, proxies)
    pub fn with_base_url(mut self, provider: ProviderId, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_urls
            .insert(provider, base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn has_key(&self, provider: ProviderId) -> bool {
        self.api_keys.contains_key(&provider)
    }

    fn base_url(&self, provider: ProviderId) -> &str {
        self.base_urls.get(&provider).map(String::as_str).unwrap_or_default()
    }

    async fn openai_request(&self, api_key: &str, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        let request_body = json!({
            "model": config.model,
            "messages": [
                { "role": "system", "content": prompt.system() },
                { "role": "user", "content": prompt.user() }
            ],
            "max_tokens": config.max_tokens,
            "temperature": config.temperature
        });

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url(ProviderId::OpenAI)))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request_body);

        let body = self.send(request, config).await?;
        parse_openai(&body, &config.model)
    }

    async fn anthropic_request(&self, api_key: &str, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        let request_body = json!({
            "model": config.model,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "system": prompt.system(),
            "messages": [
                { "role": "user", "content": prompt.user() }
            ]
        });

        let request = self
            .client
            .post(format!("{}/v1/messages", self.base_url(ProviderId::Anthropic)))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body);

        let body = self.send(request, config).await?;
        parse_anthropic(&body, &config.model)
    }

    async fn gemini_request(&self, api_key: &str, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        let request_body = json!({
            "systemInstruction": {
                "parts": [{ "text": prompt.system() }]
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt.user() }]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": config.max_tokens,
                "temperature": config.temperature
            }
        });

        let request = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url(ProviderId::Gemini),
                config.model
            ))
            .query(&[("key", api_key)])
            .json(&request_body);

        let body = self.send(request, config).await?;
        parse_gemini(&body, &config.model)
    }

    /// Send, map non-success status codes and decode the JSON body
    async fn send(&self, request: reqwest::RequestBuilder, config: &ProviderConfig) -> Result<Value, ApiFailure> {
        let response = request
            .timeout(config.request_timeout())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(provider = %config.provider, status = status.as_u16(), "provider returned error status");
            return Err(map_status(status.as_u16(), &config.model));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiFailure::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn invoke(&self, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        let api_key = self
            .api_keys
            .get(&config.provider)
            .ok_or(ApiFailure::MissingApiKey)?;

        match config.provider {
            ProviderId::OpenAI => self.openai_request(api_key, prompt, config).await,
            ProviderId::Anthropic => self.anthropic_request(api_key, prompt, config).await,
            ProviderId::Gemini => self.gemini_request(api_key, prompt, config).await,
        }
    }
}

/// Classify a non-success HTTP status
pub fn map_status(status: u16, model: &str) -> ApiFailure {
    match status {
        401 | 403 => ApiFailure::AuthenticationFailed,
        404 => ApiFailure::ModelNotFound(model.to_string()),
        408 => ApiFailure::NetworkTimeout,
        429 => ApiFailure::RateLimitExceeded,
        503 | 529 => ApiFailure::ServiceUnavailable,
        500..=599 => ApiFailure::ServerError(status.to_string()),
        _ => ApiFailure::InvalidRequest(format!("HTTP {status}")),
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiFailure {
    if error.is_timeout() {
        ApiFailure::NetworkTimeout
    } else {
        ApiFailure::NetworkError(error.to_string())
    }
}

fn non_empty(text: String) -> Result<String, ApiFailure> {
    if text.trim().is_empty() {
        Err(ApiFailure::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn usage_pair(usage: Option<&Value>, input_key: &str, output_key: &str) -> Option<TokenUsage> {
    let usage = usage?;
    Some(TokenUsage {
        input_tokens: usage.get(input_key)?.as_u64()?,
        output_tokens: usage.get(output_key)?.as_u64()?,
    })
}

pub fn parse_openai(body: &Value, model: &str) -> Result<RawResponse, ApiFailure> {
    let choice = body
        .get("choices")
        .and_then(|choices| choices.get(0))
        .ok_or_else(|| ApiFailure::InvalidResponse("no choices in response".to_string()))?;

    let content = choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or_else(|| ApiFailure::InvalidResponse("no content in response".to_string()))?;

    let truncated = choice.get("finish_reason").and_then(Value::as_str) == Some("length");

    Ok(RawResponse {
        text: non_empty(content.to_string())?,
        model: body.get("model").and_then(Value::as_str).unwrap_or(model).to_string(),
        usage: usage_pair(body.get("usage"), "prompt_tokens", "completion_tokens"),
        truncated,
    })
}

pub fn parse_anthropic(body: &Value, model: &str) -> Result<RawResponse, ApiFailure> {
    let blocks = body
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiFailure::InvalidResponse("no content in response".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    let truncated = body.get("stop_reason").and_then(Value::as_str) == Some("max_tokens");

    Ok(RawResponse {
        text: non_empty(text)?,
        model: body.get("model").and_then(Value::as_str).unwrap_or(model).to_string(),
        usage: usage_pair(body.get("usage"), "input_tokens", "output_tokens"),
        truncated,
    })
}

pub fn parse_gemini(body: &Value, model: &str) -> Result<RawResponse, ApiFailure> {
    let candidate = body
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .ok_or_else(|| ApiFailure::InvalidResponse("no candidates in response".to_string()))?;

    // safety-blocked candidates come back without parts
    let text: String = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let truncated = candidate.get("finishReason").and_then(Value::as_str) == Some("MAX_TOKENS");

    Ok(RawResponse {
        text: non_empty(text)?,
        model: model.to_string(),
        usage: usage_pair(body.get("usageMetadata"), "promptTokenCount", "candidatesTokenCount"),
        truncated,
    })
}
