//! Tests for drafter services
//!
//! Provider calls are mocked at the `ProviderClient` seam; response parsing is
//! exercised against recorded provider payloads.

pub mod provider_client;

pub use crate::traits::*;
