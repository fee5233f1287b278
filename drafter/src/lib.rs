//! Drafter library for government correspondence generation
//!
//! Turns a structured drafting request into a formatted draft by way of a
//! per-document-type template, an ordered chain of LLM providers with retry
//! and fallback, structural cleanup of the output, and token/cost accounting.

pub mod config;
pub mod core;
pub mod error;
pub mod generator_impl;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::DrafterConfig;
pub use error::{DrafterError, DrafterResult};
pub use generator_impl::DocumentGenerator;
pub use traits::*;
pub use types::*;
pub use services::{HttpProviderClient, ProviderAdapter, RetryPolicy};
