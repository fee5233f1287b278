//! Formatting templates, one per document type

use std::collections::HashMap;

use shared::{DocumentType, TemplateInfo};

use crate::error::{DrafterError, DrafterResult};

/// Fields every request must carry regardless of document type
pub const BASE_REQUIRED_FIELDS: [&str; 2] = ["subject", "content"];

/// Format contract for one document type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub document_type: DocumentType,
    pub name: &'static str,
    pub description: &'static str,
    /// Section markers the generated text must carry, in layout order
    pub required_sections: &'static [&'static str],
    /// Metadata keys the prompt cannot be built without
    pub required_metadata: &'static [&'static str],
    /// Closing lines after which a trailing "Note:" is model commentary
    pub sign_off: &'static [&'static str],
    pub system_instruction: &'static str,
    /// Skeleton shown to the model; placeholders in brackets
    pub layout: &'static str,
}

impl Template {
    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            id: self.document_type.id().to_string(),
            name: self.name.to_string(),
            document_type: self.document_type,
            description: self.description.to_string(),
            required_fields: BASE_REQUIRED_FIELDS
                .iter()
                .chain(self.required_metadata.iter())
                .map(|field| field.to_string())
                .collect(),
            sections: self.required_sections.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Alternative spellings accepted for a section marker
pub fn marker_variants(section: &str) -> &'static [&'static str] {
    match section {
        "Date" => &["Dated"],
        "Reference" => &["Ref"],
        "Attendance" => &["Present", "Attendees"],
        "Yours faithfully" => &["Yours sincerely"],
        _ => &[],
    }
}

/// Built-in template for a document type
///
/// The match is exhaustive, so adding a document type without a template
/// does not compile.
pub fn builtin_template(document_type: DocumentType) -> Template {
    match document_type {
        DocumentType::OfficialLetter => Template {
            document_type,
            name: "Official Letter",
            description: "Official government letter following the Manual of Office Procedure",
            required_sections: &["Reference", "Date", "From", "To", "Subject", "Yours faithfully"],
            required_metadata: &[],
            sign_off: &["Yours faithfully", "Yours sincerely"],
            system_instruction: "Draft an official government letter. Open with the reference \
                number and date, then the From and To blocks, the subject line, a formal \
                salutation, the body in clear paragraphs ending with the action requested, and \
                close with 'Yours faithfully' above the sender's name and designation. List \
                copy recipients under 'Copy to' when relevant.",
            layout: "\
Reference No.: [Reference Number]
Date: [DD/MM/YYYY]

From:
[Sender Name]
[Sender Designation]
[Department]
[Office Address]

To:
[Recipient Name]
[Recipient Designation]
[Recipient Organization]

Subject: [Subject]

[Salutation]

[Body: formal paragraphs]

[Action required / request]

Thanking you,

Yours faithfully,

[Sender Name]
[Sender Designation]

Copy to:
1. [Relevant authority]
2. Guard File",
        },
        DocumentType::Email => Template {
            document_type,
            name: "Email",
            description: "Formal government email",
            required_sections: &["Subject", "Dear", "Regards"],
            required_metadata: &["recipient_name"],
            sign_off: &["Regards"],
            system_instruction: "Draft a formal government email. Keep it concise: a subject \
                line, a courteous greeting addressed to the recipient by name, the context, \
                the main points in short paragraphs, the next steps, and a 'Regards' sign-off \
                with the sender's designation and department.",
            layout: "\
Subject: [Subject]

Dear [Recipient Name],

[Greeting and context]

[Main content: short paragraphs]

[Next steps / call to action]

Regards,
[Sender Name]
[Sender Designation]
[Department]
Contact: [Phone / Email]",
        },
        DocumentType::MeetingMinutes => Template {
            document_type,
            name: "Meeting Minutes",
            description: "Official minutes of meeting with decisions and action points",
            required_sections: &[
                "Minutes of Meeting",
                "Attendance",
                "Agenda",
                "Discussion",
                "Decisions Taken",
                "Action Points",
            ],
            required_metadata: &["meeting_date"],
            sign_off: &["Recorded by", "Approved by"],
            system_instruction: "Draft official minutes of a meeting. Record the reference \
                number, date, venue and subject, then the attendance with designations, the \
                numbered agenda, a point-by-point summary of the discussion, the numbered \
                decisions taken, and the action points with responsibility and timeline.",
            layout: "\
MINUTES OF MEETING

Reference No.: [Number]
Date: [Meeting Date]
Venue: [Meeting Venue]

Subject: [Subject]

ATTENDANCE:
[Attendees with designation]

AGENDA:
[Numbered agenda items]

DISCUSSION:
[Point-by-point summary]

DECISIONS TAKEN:
[Numbered decisions]

ACTION POINTS:
[Action / responsibility / timeline]

Meeting concluded at [Time]

Recorded by: [Name]
Approved by: [Chairperson]",
        },
        DocumentType::Memo => Template {
            document_type,
            name: "Office Memorandum",
            description: "Office memorandum in numbered paragraphs",
            required_sections: &["Office Memorandum", "No.", "Subject", "Distribution"],
            required_metadata: &[],
            sign_off: &["Distribution"],
            system_instruction: "Draft an office memorandum. Head it with the government and \
                department name, the words OFFICE MEMORANDUM, the memorandum number and date, \
                and the subject. Write the body as numbered paragraphs in the third person, \
                then the signature block and the distribution list.",
            layout: "\
GOVERNMENT OF [State]
[Department]

OFFICE MEMORANDUM

No. [Reference Number]
Dated: [DD/MM/YYYY]

Subject: [Subject]

1. [Numbered paragraphs]

[Sender Name]
[Sender Designation]

Distribution:
[Recipients]",
        },
        DocumentType::Circular => Template {
            document_type,
            name: "Circular",
            description: "Government circular addressed to all concerned",
            required_sections: &["Circular", "No.", "Subject", "To"],
            required_metadata: &[],
            sign_off: &["This issues with the approval"],
            system_instruction: "Draft a government circular. Head it with the government and \
                department name, the word CIRCULAR, the circular number and date, the subject \
                and the addressees. State the directive or information as clear numbered \
                points and close with the approval line and the issuing officer.",
            layout: "\
GOVERNMENT OF [State]
[Department]

CIRCULAR

No. [Reference Number]
Date: [DD/MM/YYYY]

Subject: [Subject]

To: [All concerned departments / officials]

1. [Directive or information in numbered points]

This issues with the approval of the competent authority.

[Sender Name]
[Sender Designation]",
        },
        DocumentType::Notice => Template {
            document_type,
            name: "Notice",
            description: "Public or office notice",
            required_sections: &["Notice", "No.", "Subject", "Date"],
            required_metadata: &[],
            sign_off: &[],
            system_instruction: "Draft an official notice. Head it with the department name and \
                the word NOTICE, the notice number and date, and the subject. State what is \
                being notified, to whom it applies, and any deadline or venue, then close with \
                the issuing officer's name and designation.",
            layout: "\
[Department]

NOTICE

No. [Reference Number]
Date: [DD/MM/YYYY]

Subject: [Subject]

[What is notified, who it applies to, deadlines / venue]

[Sender Name]
[Sender Designation]",
        },
    }
}

/// Read-only lookup from document type to template
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<DocumentType, Template>,
}

impl TemplateRegistry {
    /// Registry with the built-in template for every document type
    pub fn new() -> Self {
        Self {
            templates: DocumentType::ALL
                .into_iter()
                .map(|doc_type| (doc_type, builtin_template(doc_type)))
                .collect(),
        }
    }

    /// Registry from an explicit template set; every document type must be covered exactly once
    pub fn from_templates(templates: Vec<Template>) -> DrafterResult<Self> {
        let mut by_type = HashMap::new();
        for template in templates {
            if template.required_sections.is_empty() {
                return Err(DrafterError::configuration(format!(
                    "template for {} declares no required sections",
                    template.document_type
                )));
            }
            let doc_type = template.document_type;
            if by_type.insert(doc_type, template).is_some() {
                return Err(DrafterError::configuration(format!(
                    "duplicate template for {doc_type}"
                )));
            }
        }

        if let Some(missing) = DocumentType::ALL.iter().find(|t| !by_type.contains_key(t)) {
            return Err(DrafterError::configuration(format!("no template for {missing}")));
        }

        Ok(Self { templates: by_type })
    }

    pub fn resolve(&self, document_type: DocumentType) -> DrafterResult<&Template> {
        self.templates
            .get(&document_type)
            .ok_or_else(|| DrafterError::configuration(format!("no template for {document_type}")))
    }

    /// Catalogue entries in `DocumentType::ALL` order
    pub fn catalogue(&self) -> Vec<TemplateInfo> {
        DocumentType::ALL
            .iter()
            .filter_map(|doc_type| self.templates.get(doc_type))
            .map(Template::info)
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
