//! Drafter core business logic

pub mod processor;
pub mod prompt;
pub mod templates;
pub mod usage;

pub use processor::{line_has_marker, line_has_section, PostProcessor};
pub use prompt::PromptBuilder;
pub use templates::{builtin_template, Template, TemplateRegistry};
pub use usage::{account, estimate_tokens, PricingTable};
