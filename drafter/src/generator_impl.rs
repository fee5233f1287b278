//! Document generator: template, prompt, providers, cleanup, accounting

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::{
    request_debug, request_error, request_info, request_warn, GenerationRequest, GenerationResult,
    ProviderConfig, TemplateInfo,
};
use uuid::Uuid;

use crate::config::DrafterConfig;
use crate::core::{account, PostProcessor, PricingTable, PromptBuilder, TemplateRegistry};
use crate::error::DrafterResult;
use crate::services::fallback::{ProviderAdapter, RetryPolicy};
use crate::traits::ProviderClient;
use crate::types::{Budget, FallbackSuccess, OfficeProfile};

/// Runs one request through every stage, strictly in sequence
///
/// Holds only read-only state, so one instance can serve many concurrent
/// requests behind an `Arc`.
pub struct DocumentGenerator<C: ProviderClient> {
    registry: Arc<TemplateRegistry>,
    prompt_builder: PromptBuilder,
    post_processor: PostProcessor,
    adapter: ProviderAdapter<C>,
    pricing: Arc<PricingTable>,
}

impl<C: ProviderClient> DocumentGenerator<C> {
    pub fn new(
        client: C,
        registry: Arc<TemplateRegistry>,
        office: OfficeProfile,
        pricing: Arc<PricingTable>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            prompt_builder: PromptBuilder::new(office),
            post_processor: PostProcessor::new(),
            adapter: ProviderAdapter::new(client, retry),
            pricing,
        }
    }

    pub fn from_config(client: C, config: &DrafterConfig) -> Self {
        Self::new(
            client,
            Arc::new(TemplateRegistry::new()),
            config.office.clone(),
            Arc::new(config.pricing.clone()),
            config.retry,
        )
    }

    pub fn client(&self) -> &C {
        self.adapter.client()
    }

    pub fn catalogue(&self) -> Vec<TemplateInfo> {
        self.registry.catalogue()
    }

    /// Produce a draft, trying `providers` in order within `timeout`
    ///
    /// A structurally incomplete draft is still a success, flagged `PARTIAL`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        providers: &[ProviderConfig],
        timeout: Duration,
    ) -> DrafterResult<GenerationResult> {
        let id = Uuid::new_v4();
        let budget = Budget::start(timeout);
        request_info!(id, document_type = %request.document_type, priority = %request.priority, "generation started");

        let template = self.registry.resolve(request.document_type)?;
        let prompt = self.prompt_builder.build(request, template).inspect_err(|e| {
            request_warn!(id, error = %e, "request rejected");
        })?;
        request_debug!(id, prompt_chars = prompt.char_count(), "prompt built");

        let FallbackSuccess {
            response,
            provider,
            attempts,
        } = self
            .adapter
            .invoke_with_fallback(&prompt, providers, &budget)
            .await
            .inspect_err(|e| {
                request_error!(id, error = %e, attempts = e.attempts().len(), "generation failed");
            })?;

        let (text, validation) = self.post_processor.validate(&response, template);
        if !validation.is_complete() {
            request_warn!(
                id,
                missing = ?validation.missing_sections,
                truncated = validation.truncated,
                "draft is partial"
            );
        }

        let (tokens, estimated_cost) = account(&prompt, &response, provider.provider, &self.pricing);
        request_info!(
            id,
            provider = %provider.provider,
            model = %response.model,
            attempts = attempts.len(),
            input_tokens = tokens.input_tokens,
            output_tokens = tokens.output_tokens,
            status = %validation.status,
            "generation finished"
        );

        Ok(GenerationResult {
            id,
            created_at: Utc::now(),
            document_type: request.document_type,
            subject: request.subject.trim().to_string(),
            priority: request.priority,
            text,
            provider: provider.provider,
            model: response.model,
            attempts,
            tokens,
            estimated_cost,
            validation,
        })
    }
}
