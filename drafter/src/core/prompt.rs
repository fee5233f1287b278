//! Prompt assembly from a request and its template

use serde_json::Value;
use shared::{DocumentType, GenerationRequest, Priority};

use crate::core::templates::Template;
use crate::error::{DrafterError, DrafterResult};
use crate::types::{OfficeProfile, Prompt};

const DEFAULT_SENDER_NAME: &str = "Project Director";
const DEFAULT_SENDER_DESIGNATION: &str = "Project Director, PMU";

/// Metadata keys with a dedicated place in the user message, in output order.
/// Any other key is listed afterwards under "Other details", sorted by key.
const KNOWN_METADATA_KEYS: [&str; 13] = [
    "sender_name",
    "sender_designation",
    "recipient_name",
    "recipient_designation",
    "recipient_organization",
    "reference_number",
    "meeting_date",
    "meeting_venue",
    "attendees",
    "agenda_items",
    "agenda",
    "attachments",
    "additional_context",
];

const DRAFTING_RULES: &str = "\
Drafting rules:
- Use formal, respectful official language and the active voice where possible.
- Be clear and concise; avoid jargon unless it is a standard official term.
- Keep a logical flow: context, then the main points, then the action required.
- Use numbered points for lists and decisions.
- Keep the tone courteous and professional throughout.";

const FORMATTING_RULES: &str = "\
Formatting rules:
- Write dates as DD/MM/YYYY.
- Reference numbers follow DEPT/SECTION/YEAR/NUMBER unless one is supplied.
- Choose the salutation by hierarchy: 'Sir/Madam' for senior officers, 'Dear <Name>' for peers and colleagues.
- Keep every section heading listed above on its own line, spelled exactly as given.
- Output only the document itself: no commentary, notes or markdown fences.";

/// Builds provider-agnostic prompts
///
/// Output depends only on the request, the template and the office profile,
/// so the same inputs always yield the same bytes.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    office: OfficeProfile,
}

impl PromptBuilder {
    pub fn new(office: OfficeProfile) -> Self {
        Self { office }
    }

    pub fn office(&self) -> &OfficeProfile {
        &self.office
    }

    pub fn build(&self, request: &GenerationRequest, template: &Template) -> DrafterResult<Prompt> {
        Self::check_request(request, template)?;

        Ok(Prompt::new(
            self.system_message(template),
            self.user_message(request, template),
        ))
    }

    fn check_request(request: &GenerationRequest, template: &Template) -> DrafterResult<()> {
        if request.subject.trim().is_empty() {
            return Err(DrafterError::missing_field("subject"));
        }
        if request.content.trim().is_empty() {
            return Err(DrafterError::missing_field("content"));
        }
        if let Some(field) = template
            .required_metadata
            .iter()
            .find(|field| !request.has_metadata(field))
        {
            return Err(DrafterError::missing_field(field));
        }
        Ok(())
    }

    fn system_message(&self, template: &Template) -> String {
        let sections = template
            .required_sections
            .iter()
            .enumerate()
            .map(|(index, section)| format!("{}. {}", index + 1, section))
            .collect::<Vec<_>>()
            .join("\n");

        [
            format!(
                "You are an expert drafter of official correspondence for the {}, Government of {}.\nOffice address: {}",
                self.office.department_name, self.office.state_name, self.office.office_address
            ),
            template.system_instruction.to_string(),
            DRAFTING_RULES.to_string(),
            format!("Required sections, in this order:\n{sections}"),
            FORMATTING_RULES.to_string(),
        ]
        .join("\n\n")
    }

    fn user_message(&self, request: &GenerationRequest, template: &Template) -> String {
        let mut blocks = vec![
            format!(
                "Generate {} with the following details:",
                document_phrase(request.document_type)
            ),
            format!("Subject: {}", request.subject.trim()),
            format!("Main content:\n{}", request.content.trim()),
        ];

        match request.priority {
            Priority::High | Priority::Urgent => blocks.push(format!(
                "Priority: {} (mark the document '{}' at the top)",
                request.priority.to_string().to_uppercase(),
                request.priority.to_string().to_uppercase()
            )),
            Priority::Low | Priority::Normal => {
                blocks.push(format!("Priority: {}", request.priority))
            }
        }

        blocks.push(self.sender_block(request));

        let details: Vec<String> = KNOWN_METADATA_KEYS
            .iter()
            .filter(|key| !key.starts_with("sender_"))
            .filter_map(|key| render_field(request, key))
            .collect();
        if !details.is_empty() {
            blocks.push(details.join("\n"));
        }

        let extras: Vec<String> = request
            .metadata
            .keys()
            .filter(|key| !KNOWN_METADATA_KEYS.contains(&key.as_str()))
            .filter_map(|key| render_field(request, key))
            .collect();
        if !extras.is_empty() {
            blocks.push(format!("Other details:\n{}", extras.join("\n")));
        }

        blocks.push(format!("Use this layout:\n{}", template.layout));
        blocks.push(format!(
            "Produce the complete {} now, ready for signature. Include every required section heading.",
            template.name
        ));

        blocks.join("\n\n")
    }

    fn sender_block(&self, request: &GenerationRequest) -> String {
        let name = request
            .metadata_text("sender_name")
            .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string());
        let designation = request
            .metadata_text("sender_designation")
            .unwrap_or_else(|| DEFAULT_SENDER_DESIGNATION.to_string());
        format!(
            "Sender: {name}\nSender designation: {designation}\nSender department: {}",
            self.office.department_name
        )
    }
}

/// "Label: value" line for one metadata key; lists become numbered lines
fn render_field(request: &GenerationRequest, key: &str) -> Option<String> {
    let label = field_label(key);
    match request.metadata.get(key)? {
        Value::Array(items) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(value_text)
                .enumerate()
                .map(|(index, item)| format!("{}. {}", index + 1, item))
                .collect();
            (!lines.is_empty()).then(|| format!("{label}:\n{}", lines.join("\n")))
        }
        _ => request
            .metadata_text(key)
            .map(|value| format!("{label}: {value}")),
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(fields) if fields.contains_key("name") || fields.contains_key("designation") => {
            let parts: Vec<String> = ["name", "designation"]
                .iter()
                .filter_map(|key| fields.get(*key).and_then(value_text))
                .collect();
            (!parts.is_empty()).then(|| parts.join(" - "))
        }
        other => Some(other.to_string()),
    }
}

/// "an official letter", "meeting minutes"
fn document_phrase(document_type: DocumentType) -> String {
    let label = document_type.label();
    match document_type {
        DocumentType::MeetingMinutes => label,
        _ if label.starts_with(['a', 'e', 'i', 'o', 'u']) => format!("an {label}"),
        _ => format!("a {label}"),
    }
}

/// "meeting_date" -> "Meeting date"
fn field_label(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
