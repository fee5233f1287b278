//! Drafter trait definitions for dependency injection

use async_trait::async_trait;

use shared::{ApiFailure, ProviderConfig};
use crate::types::{Prompt, RawResponse};

/// One text-generation call against the provider named in `config`
///
/// Implementations make exactly one remote call and classify failures into
/// [`ApiFailure`]; retry and fallback live above this seam.
#[mockall::automock]
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn invoke(&self, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure>;
}

#[async_trait]
impl<T: ProviderClient + ?Sized> ProviderClient for std::sync::Arc<T> {
    async fn invoke(&self, prompt: &Prompt, config: &ProviderConfig) -> Result<RawResponse, ApiFailure> {
        (**self).invoke(prompt, config).await
    }
}
