//! Template catalogue entries

use serde::{Deserialize, Serialize};

use crate::types::DocumentType;

/// What the request-handling layer needs to know to offer a document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub document_type: DocumentType,
    pub description: String,
    pub required_fields: Vec<String>,
    pub sections: Vec<String>,
}
