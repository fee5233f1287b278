//! Drafter services implementations

pub mod fallback;
pub mod provider_client;

#[cfg(test)]
pub mod tests;

pub use fallback::{ProviderAdapter, RetryPolicy};
pub use provider_client::HttpProviderClient;
