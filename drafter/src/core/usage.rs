//! Token accounting and cost estimation

use std::collections::HashMap;

use shared::{ProviderId, TokenUsage};

use crate::error::{DrafterError, DrafterResult};
use crate::types::{Prompt, ProviderPricing, RawResponse};

/// Per-provider pricing, USD per million tokens
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    prices: HashMap<ProviderId, ProviderPricing>,
}

impl PricingTable {
    /// Table with no prices; every cost comes out as 0.0
    pub fn empty() -> Self {
        Self { prices: HashMap::new() }
    }

    pub fn with_price(mut self, provider: ProviderId, pricing: ProviderPricing) -> Self {
        self.prices.insert(provider, pricing);
        self
    }

    pub fn get(&self, provider: ProviderId) -> Option<ProviderPricing> {
        self.prices.get(&provider).copied()
    }

    /// Apply overrides written as `provider:input:output,...`
    pub fn with_overrides(mut self, spec: &str) -> DrafterResult<Self> {
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [provider, input, output] = parts.as_slice() else {
                return Err(DrafterError::configuration(format!(
                    "pricing entry '{entry}' must be provider:input:output"
                )));
            };

            let provider: ProviderId = provider.parse()?;
            let input = parse_price(entry, input)?;
            let output = parse_price(entry, output)?;
            self.prices.insert(provider, ProviderPricing::new(input, output));
        }
        Ok(self)
    }

    pub fn cost(&self, provider: ProviderId, usage: &TokenUsage) -> f64 {
        match self.prices.get(&provider) {
            Some(pricing) => {
                let input_cost = (usage.input_tokens as f64 / 1_000_000.0) * pricing.input_per_million;
                let output_cost = (usage.output_tokens as f64 / 1_000_000.0) * pricing.output_per_million;
                input_cost + output_cost
            }
            None => 0.0, // Unknown provider
        }
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::empty()
            .with_price(ProviderId::Anthropic, ProviderPricing::new(3.00, 15.00))
            .with_price(ProviderId::OpenAI, ProviderPricing::new(2.50, 10.00))
            .with_price(ProviderId::Gemini, ProviderPricing::new(1.25, 5.00))
    }
}

fn parse_price(entry: &str, raw: &str) -> DrafterResult<f64> {
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(DrafterError::configuration(format!(
            "pricing entry '{entry}' has invalid price '{raw}'"
        ))),
    }
}

/// Rough token count for text without provider-reported usage
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count().div_ceil(4) as u64
}

/// Token usage and estimated cost for one successful generation
///
/// Provider-reported usage wins; otherwise both sides are estimated from
/// character counts.
pub fn account(
    prompt: &Prompt,
    response: &RawResponse,
    provider: ProviderId,
    pricing: &PricingTable,
) -> (TokenUsage, f64) {
    let usage = response.usage.unwrap_or_else(|| TokenUsage {
        input_tokens: (prompt.char_count() as u64).div_ceil(4),
        output_tokens: estimate_tokens(&response.text),
    });
    let cost = pricing.cost(provider, &usage);
    (usage, cost)
}
