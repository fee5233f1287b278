//! Test fixtures and utilities

pub mod documents;
pub mod scripted_provider;

#[allow(unused_imports)]
pub use documents::*;
pub use scripted_provider::*;
