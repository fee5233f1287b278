//! Message types exchanged with the collaborators around the drafting core
//!
//! This module organizes boundary messages by category:
//! - `generation`: request in, result (with attempt log) out
//! - `catalogue`: template listing for the request-handling layer
//! - `stats`: usage aggregation over persisted results

pub mod catalogue;
pub mod generation;
pub mod stats;

pub use catalogue::TemplateInfo;

pub use generation::{
    AttemptOutcome, GenerationRequest, GenerationResult, ProviderAttempt, ValidationReport,
};

pub use stats::UsageSummary;
