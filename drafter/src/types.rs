//! Drafter-internal data types

use std::time::Duration;

use shared::{ProviderAttempt, ProviderConfig, TokenUsage};
use tokio::time::Instant;

/// Provider-agnostic prompt, built once per request and only ever borrowed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prompt {
    system: String,
    user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Character count of both parts, used for token estimates
    pub fn char_count(&self) -> usize {
        self.system.chars().count() + self.user.chars().count()
    }
}

/// Provider response data
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub text: String,
    pub model: String,
    /// Provider-reported usage, when the provider sent one
    pub usage: Option<TokenUsage>,
    /// Provider stopped because it hit the output-token limit
    pub truncated: bool,
}

impl RawResponse {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            usage: None,
            truncated: false,
        }
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage = Some(TokenUsage { input_tokens, output_tokens });
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}

/// Roughly 30 years, used when a deadline would overflow `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `from + span`, clamped to a far-future instant instead of overflowing
pub fn deadline_after(from: Instant, span: Duration) -> Instant {
    from.checked_add(span)
        .or_else(|| from.checked_add(FAR_FUTURE))
        .unwrap_or(from)
}

/// Wall-clock budget shared by every stage of one generation
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    deadline: Instant,
    total: Duration,
}

impl Budget {
    pub fn start(total: Duration) -> Self {
        Self {
            deadline: deadline_after(Instant::now(), total),
            total,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Winning provider response with the attempt log that led to it
#[derive(Debug, Clone)]
pub struct FallbackSuccess {
    pub response: RawResponse,
    pub provider: ProviderConfig,
    pub attempts: Vec<ProviderAttempt>,
}

/// USD per million tokens for one provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ProviderPricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }
}

/// Sender block and office details injected into every system prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeProfile {
    pub department_name: String,
    pub state_name: String,
    pub office_address: String,
}

impl Default for OfficeProfile {
    fn default() -> Self {
        Self {
            department_name: "Urban Development Department".to_string(),
            state_name: "Maharashtra".to_string(),
            office_address: "Mantralaya, Mumbai - 400032".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_after_clamps_on_overflow() {
        let now = Instant::now();

        assert_eq!(deadline_after(now, Duration::from_secs(5)), now + Duration::from_secs(5));
        assert!(deadline_after(now, Duration::MAX) > now + Duration::from_secs(86400 * 365));
    }

    #[test]
    fn test_huge_budget_is_not_exhausted() {
        let budget = Budget::start(Duration::from_secs(u64::MAX));

        assert_eq!(budget.total(), Duration::from_secs(u64::MAX));
        assert!(budget.remaining() > Duration::from_secs(86400));
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_zero_budget_is_exhausted() {
        assert!(Budget::start(Duration::ZERO).is_exhausted());
    }
}
