//! Environment-based drafter configuration
//!
//! Values come from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Environment variables take precedence over .env file values. Parsing goes
//! through [`DrafterConfig::from_lookup`] so tests can feed a plain map.
//!
//! ## Provider keys
//! - `ANTHROPIC_API_KEY`
//! - `OPENAI_API_KEY`
//! - `GOOGLE_API_KEY`, `GOOGLE_AI_API_KEY` (Gemini)
//!
//! At least one key is required; only providers with a key join the chain.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use shared::{ProviderConfig, ProviderId, SharedError};
use tracing::warn;

use crate::core::usage::PricingTable;
use crate::error::{DrafterError, DrafterResult};
use crate::services::fallback::RetryPolicy;
use crate::types::OfficeProfile;

const DEFAULT_PRIMARY: ProviderId = ProviderId::Anthropic;
const DEFAULT_FALLBACK_MODEL: &str = "gpt-4o";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Fallback order after the primary provider
const PROVIDER_ORDER: [ProviderId; 3] = [ProviderId::Anthropic, ProviderId::OpenAI, ProviderId::Gemini];

/// Immutable configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct DrafterConfig {
    pub api_keys: HashMap<ProviderId, String>,
    /// Ordered provider chain, keyed providers only
    pub providers: Vec<ProviderConfig>,
    pub generation_timeout: Duration,
    pub retry: RetryPolicy,
    pub pricing: PricingTable,
    pub office: OfficeProfile,
}

impl DrafterConfig {
    /// Load `.env` then read the process environment
    pub fn from_env() -> DrafterResult<Self> {
        // silently skipped when there is no .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> DrafterResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut api_keys = HashMap::new();
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            api_keys.insert(ProviderId::Anthropic, key);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            api_keys.insert(ProviderId::OpenAI, key);
        }
        if let Some(key) = get("GOOGLE_API_KEY").or_else(|| get("GOOGLE_AI_API_KEY")) {
            api_keys.insert(ProviderId::Gemini, key);
        }
        if api_keys.is_empty() {
            return Err(DrafterError::configuration(
                "no provider API key set (ANTHROPIC_API_KEY, OPENAI_API_KEY or GOOGLE_API_KEY)",
            ));
        }

        let max_tokens: u32 = parse_or(&get, "MAX_TOKENS", 4000)?;
        let temperature: f32 = parse_or(&get, "TEMPERATURE", 0.3)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid("TEMPERATURE", &temperature.to_string()));
        }
        let request_timeout = Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?);
        let generation_timeout = Duration::from_secs(parse_or(&get, "GENERATION_TIMEOUT_SECS", 90)?);
        if generation_timeout.is_zero() {
            return Err(invalid("GENERATION_TIMEOUT_SECS", "0"));
        }

        let retry = RetryPolicy::new(
            parse_or(&get, "MAX_RETRIES", 2)?,
            Duration::from_millis(parse_or(&get, "RETRY_BACKOFF_MS", 500)?),
        );

        let chain = match get("PROVIDER_PRIORITY") {
            Some(spec) => parse_priority(&spec, &get)?,
            None => derived_chain(&get)?,
        };
        let providers: Vec<ProviderConfig> = chain
            .into_iter()
            .filter(|config| {
                let keyed = api_keys.contains_key(&config.provider);
                if !keyed {
                    warn!(provider = %config.provider, "no API key for provider, dropping it from the chain");
                }
                keyed
            })
            .map(|config| {
                config
                    .with_limits(max_tokens, temperature)
                    .with_request_timeout(request_timeout)
            })
            .collect();
        if providers.is_empty() {
            return Err(DrafterError::configuration(
                "no provider in the priority list has an API key",
            ));
        }

        let pricing = match get("PRICING") {
            Some(spec) => PricingTable::default().with_overrides(&spec)?,
            None => PricingTable::default(),
        };

        let defaults = OfficeProfile::default();
        let office = OfficeProfile {
            department_name: get("DEPARTMENT_NAME").unwrap_or(defaults.department_name),
            state_name: get("STATE_NAME").unwrap_or(defaults.state_name),
            office_address: get("OFFICE_ADDRESS").unwrap_or(defaults.office_address),
        };

        Ok(Self {
            api_keys,
            providers,
            generation_timeout,
            retry,
            pricing,
            office,
        })
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }
}

/// Model used for a provider when the priority entry names none
fn default_model(provider: ProviderId, primary: ProviderId, get: &impl Fn(&str) -> Option<String>) -> String {
    if provider == primary {
        if let Some(model) = get("MODEL_NAME") {
            return model;
        }
    }
    match provider {
        ProviderId::OpenAI => get("FALLBACK_MODEL").unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string()),
        ProviderId::Gemini => get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        ProviderId::Anthropic => ProviderConfig::with_default_model(provider).model,
    }
}

fn primary_provider(get: &impl Fn(&str) -> Option<String>) -> DrafterResult<ProviderId> {
    match get("PRIMARY_LLM") {
        Some(name) => Ok(name.parse()?),
        None => Ok(DEFAULT_PRIMARY),
    }
}

/// PRIMARY_LLM first, then the remaining providers in fixed order
fn derived_chain(get: &impl Fn(&str) -> Option<String>) -> DrafterResult<Vec<ProviderConfig>> {
    let primary = primary_provider(get)?;
    Ok(std::iter::once(primary)
        .chain(PROVIDER_ORDER.into_iter().filter(|p| *p != primary))
        .map(|provider| ProviderConfig::new(provider, default_model(provider, primary, get)))
        .collect())
}

/// `provider[:model],...`; a provider may appear once
fn parse_priority(spec: &str, get: &impl Fn(&str) -> Option<String>) -> DrafterResult<Vec<ProviderConfig>> {
    let primary = primary_provider(get)?;
    let mut chain: Vec<ProviderConfig> = Vec::new();

    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, model) = match entry.split_once(':') {
            Some((name, model)) => (name.trim(), Some(model.trim())),
            None => (entry, None),
        };
        let provider: ProviderId = name.parse()?;
        if chain.iter().any(|config| config.provider == provider) {
            return Err(invalid("PROVIDER_PRIORITY", spec));
        }
        let model = match model.filter(|m| !m.is_empty()) {
            Some(model) => model.to_string(),
            None => default_model(provider, primary, get),
        };
        chain.push(ProviderConfig::new(provider, model));
    }

    if chain.is_empty() {
        return Err(invalid("PROVIDER_PRIORITY", spec));
    }
    Ok(chain)
}

fn parse_or<T: FromStr>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> DrafterResult<T> {
    match get(name) {
        Some(raw) => raw.parse().map_err(|_| invalid(name, &raw)),
        None => Ok(default),
    }
}

fn invalid(field: &str, value: &str) -> DrafterError {
    DrafterError::Shared(SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    })
}
