//! Provider client that plays back a per-provider script

#![allow(dead_code)] // Not every test binary uses every helper

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use drafter::{ProviderClient, Prompt, RawResponse};
use shared::{ApiFailure, ProviderConfig, ProviderId};

/// One scripted call: optional delay, then a reply or a failure
#[derive(Debug, Clone)]
pub struct Step {
    pub delay: Duration,
    pub result: Result<RawResponse, ApiFailure>,
}

impl Step {
    pub fn reply(text: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(RawResponse::new(text, "scripted-model")),
        }
    }

    pub fn fail(failure: ApiFailure) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(failure),
        }
    }

    /// Never answers within any test budget
    pub fn stall() -> Self {
        Self::reply("late reply").after(Duration::from_secs(30))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub provider: ProviderId,
    pub model: String,
    pub user_prompt: String,
}

#[derive(Default)]
pub struct ScriptedProvider {
    queued: Mutex<HashMap<ProviderId, VecDeque<Step>>>,
    fallback: Mutex<HashMap<ProviderId, Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a step for the next unanswered call to `provider`
    pub fn then(self, provider: ProviderId, step: Step) -> Self {
        self.queued
            .lock()
            .unwrap()
            .entry(provider)
            .or_default()
            .push_back(step);
        self
    }

    /// Step used once the queue for `provider` is empty
    pub fn always(self, provider: ProviderId, step: Step) -> Self {
        self.fallback.lock().unwrap().insert(provider, step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, provider: ProviderId) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.provider == provider)
            .count()
    }

    fn next_step(&self, provider: ProviderId) -> Step {
        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&provider)
            .and_then(VecDeque::pop_front);
        queued
            .or_else(|| self.fallback.lock().unwrap().get(&provider).cloned())
            .unwrap_or_else(|| Step::fail(ApiFailure::InvalidRequest(format!("no script for {provider}"))))
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn invoke(&self, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        self.calls.lock().unwrap().push(Call {
            provider: config.provider,
            model: config.model.clone(),
            user_prompt: prompt.user().to_string(),
        });

        let step = self.next_step(config.provider);
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.result
    }
}
