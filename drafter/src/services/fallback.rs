//! Retry and ordered fallback across providers

use std::time::Duration;

use shared::{ApiFailure, ProviderAttempt, ProviderConfig};
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::error::{DrafterError, DrafterResult};
use crate::traits::ProviderClient;
use crate::types::{deadline_after, Budget, FallbackSuccess, Prompt, RawResponse};

/// Retry behaviour applied to each provider in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra calls after the first one, transient failures only
    pub max_retries: u32,
    /// Fixed pause before each retry
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    pub fn max_calls(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(500))
    }
}

/// Classified result of one provider call
#[derive(Debug)]
enum CallOutcome {
    Success(RawResponse),
    Transient(ApiFailure),
    Permanent(ApiFailure),
    /// Budget ran out while the call was in flight
    Cancelled,
}

/// Drives a [`ProviderClient`] through the retry and fallback rules
#[derive(Debug, Clone)]
pub struct ProviderAdapter<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: ProviderClient> ProviderAdapter<C> {
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Single call bounded by the provider's request timeout and the budget
    pub async fn invoke(&self, prompt: &Prompt, config: &ProviderConfig, budget: &Budget) -> Result<RawResponse, ApiFailure> {
        match self.call(prompt, config, budget).await {
            CallOutcome::Success(response) => Ok(response),
            CallOutcome::Transient(failure) | CallOutcome::Permanent(failure) => Err(failure),
            CallOutcome::Cancelled => Err(ApiFailure::Cancelled),
        }
    }

    /// Try providers strictly in order until one succeeds
    ///
    /// Every call, retries included, lands in the attempt log in the order it
    /// was made. Non-transient failures move straight to the next provider.
    pub async fn invoke_with_fallback(
        &self,
        prompt: &Prompt,
        providers: &[ProviderConfig],
        budget: &Budget,
    ) -> DrafterResult<FallbackSuccess> {
        if providers.is_empty() {
            return Err(DrafterError::configuration("provider priority list is empty"));
        }

        let mut attempts: Vec<ProviderAttempt> = Vec::new();

        for config in providers {
            for attempt in 1..=self.policy.max_calls() {
                if budget.is_exhausted() {
                    return Err(DrafterError::Timeout {
                        budget: budget.total(),
                        attempts,
                    });
                }

                let started = Instant::now();
                let outcome = self.call(prompt, config, budget).await;
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                match outcome {
                    CallOutcome::Success(response) => {
                        info!(provider = %config.provider, model = %config.model, attempt, latency_ms, "provider call succeeded");
                        attempts.push(ProviderAttempt::success(config, attempt, latency_ms));
                        return Ok(FallbackSuccess {
                            response,
                            provider: config.clone(),
                            attempts,
                        });
                    }
                    CallOutcome::Transient(failure) => {
                        warn!(provider = %config.provider, attempt, error = %failure, "transient provider failure");
                        attempts.push(ProviderAttempt::failure(config, attempt, latency_ms, failure));
                        if attempt < self.policy.max_calls() {
                            sleep_until(deadline_after(Instant::now(), self.policy.backoff).min(budget.deadline())).await;
                        }
                    }
                    CallOutcome::Permanent(failure) => {
                        warn!(provider = %config.provider, attempt, error = %failure, "provider failed, moving to next provider");
                        attempts.push(ProviderAttempt::failure(config, attempt, latency_ms, failure));
                        break;
                    }
                    CallOutcome::Cancelled => {
                        warn!(provider = %config.provider, attempt, "generation budget exhausted mid-call");
                        attempts.push(ProviderAttempt::failure(config, attempt, latency_ms, ApiFailure::Cancelled));
                        return Err(DrafterError::Timeout {
                            budget: budget.total(),
                            attempts,
                        });
                    }
                }
            }
            debug!(provider = %config.provider, "provider exhausted");
        }

        Err(DrafterError::AllProvidersExhausted { attempts })
    }

    async fn call(&self, prompt: &Prompt, config: &ProviderConfig, budget: &Budget) -> CallOutcome {
        let request_deadline = deadline_after(Instant::now(), config.request_timeout());
        let call_deadline = request_deadline.min(budget.deadline());

        match timeout_at(call_deadline, self.client.invoke(prompt, config)).await {
            Ok(Ok(response)) if response.text.trim().is_empty() => {
                CallOutcome::Transient(ApiFailure::EmptyResponse)
            }
            Ok(Ok(response)) => CallOutcome::Success(response),
            Ok(Err(failure)) if failure.is_transient() => CallOutcome::Transient(failure),
            Ok(Err(failure)) => CallOutcome::Permanent(failure),
            Err(_) if budget.is_exhausted() => CallOutcome::Cancelled,
            Err(_) => CallOutcome::Transient(ApiFailure::NetworkTimeout),
        }
    }
}
