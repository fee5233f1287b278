//! Shared types for the correspondence drafting workspace
//!
//! Contains the types that cross the boundary between the drafting core and
//! the collaborators around it (request handling, persistence, rendering),
//! so those collaborators can depend on them without pulling in HTTP clients.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Request in, result out
    AttemptOutcome, GenerationRequest, GenerationResult, ProviderAttempt, ValidationReport,

    // Catalogue and usage reporting
    TemplateInfo, UsageSummary,
};
