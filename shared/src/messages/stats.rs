//! Usage aggregation over persisted generation results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{SharedError, SharedResult};
use crate::messages::generation::GenerationResult;
use crate::types::{DocumentType, ValidationStatus};

/// Totals across a set of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub total_documents: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cost_estimate: f64,
    pub partial_documents: u64,
    pub documents_by_type: BTreeMap<DocumentType, u64>,
}

impl UsageSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a GenerationResult>) -> Self {
        results.into_iter().fold(Self::default(), |mut summary, result| {
            summary.record(result);
            summary
        })
    }

    /// Parse one `GenerationResult` JSON document per non-empty line
    pub fn from_json_lines(input: &str) -> SharedResult<Self> {
        let mut summary = Self::default();
        for (index, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let result: GenerationResult =
                serde_json::from_str(line).map_err(|e| SharedError::DeserializationError {
                    message: format!("line {}: {e}", index + 1),
                })?;
            summary.record(&result);
        }
        Ok(summary)
    }

    pub fn record(&mut self, result: &GenerationResult) {
        self.total_documents += 1;
        self.total_input_tokens += result.tokens.input_tokens;
        self.total_output_tokens += result.tokens.output_tokens;
        self.total_cost_estimate += result.estimated_cost;
        if result.validation.status == ValidationStatus::Partial {
            self.partial_documents += 1;
        }
        *self.documents_by_type.entry(result.document_type).or_insert(0) += 1;
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens + self.total_output_tokens
    }
}
