//! Sample requests and provider outputs

#![allow(dead_code)] // Not every test binary uses every fixture

use serde_json::json;
use shared::{DocumentType, GenerationRequest, Priority};

pub const OFFICIAL_LETTER: &str = "Reference No.: UDD/PMU/2025/114
Date: 02/06/2025

From:
Project Director
Project Management Unit
Urban Development Department

To:
The Municipal Commissioner
Pune Municipal Corporation

Subject: Release of second instalment for the smart roads package

Sir,

The first instalment has been fully utilised and the utilisation certificate is enclosed.
You are requested to release the second instalment at the earliest.

Yours faithfully,

Project Director
Project Management Unit";

/// Minutes carrying every required marker except Agenda
pub const MINUTES_WITHOUT_AGENDA: &str = "MINUTES OF MEETING

Reference No.: UDD/PMU/MOM/2025/07
Date: 12/06/2025
Venue: Committee Room 2, Mantralaya

Subject: Review of stormwater drain desilting

ATTENDANCE:
1. Chief Engineer (Storm Water Drains)
2. Ward Officer, A Ward

DISCUSSION:
1. Desilting in wards A to E is 80% complete.

DECISIONS TAKEN:
1. Remaining work to finish before 25/06/2025.

ACTION POINTS:
1. Ward Officers to submit photographs by 20/06/2025.";

pub fn letter_request() -> GenerationRequest {
    GenerationRequest::new(
        DocumentType::OfficialLetter,
        "Release of second instalment for the smart roads package",
        "Request the Municipal Commissioner to release the second instalment; the first has been utilised.",
    )
    .with_priority(Priority::High)
    .with_metadata("recipient_name", "The Municipal Commissioner")
    .with_metadata("recipient_organization", "Pune Municipal Corporation")
    .with_metadata("reference_number", "UDD/PMU/2025/114")
}

pub fn minutes_request() -> GenerationRequest {
    GenerationRequest::new(
        DocumentType::MeetingMinutes,
        "Review of stormwater drain desilting",
        "Pre-monsoon review of desilting progress.",
    )
    .with_metadata("meeting_date", "12/06/2025")
    .with_metadata("meeting_venue", "Committee Room 2, Mantralaya")
    .with_metadata("attendees", json!(["Chief Engineer (Storm Water Drains)", "Ward Officer, A Ward"]))
}
