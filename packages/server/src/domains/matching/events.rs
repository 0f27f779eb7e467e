//! Wire contracts for the matching pipeline.
//!
//! Inbound `applicants.created` payloads deserialize straight into
//! [`ApplicantSnapshot`]; this module owns the outbound match event and the
//! subject/stream names both consumers bind to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject carrying applicant-created events from the registration service.
pub const APPLICANT_CREATED_SUBJECT: &str = "applicants.created";

/// Subject carrying one match event per qualifying company.
pub const APPLICANT_MATCHED_SUBJECT: &str = "applicants.matched";

/// JetStream stream retaining applicant-created events.
pub const APPLICANTS_STREAM: &str = "APPLICANTS";

/// JetStream stream retaining match events for the notification sink.
pub const MATCHES_STREAM: &str = "MATCHES";

/// Durable consumer name for the applicant event consumer.
pub const MATCHER_CONSUMER: &str = "matcher";

/// Durable consumer name for the notification sink.
pub const SINK_CONSUMER: &str = "notification-sink";

/// Outbound signal that one applicant satisfies one company's profile.
///
/// May be delivered (and therefore observed) more than once per pair; the
/// sink's pair-keyed upsert absorbs duplicates. No ordering is guaranteed
/// within or across pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantMatchedEvent {
    pub company_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_event_wire_format_is_camel_case() {
        let event = ApplicantMatchedEvent {
            company_id: Uuid::nil(),
            applicant_id: Uuid::nil(),
            applicant_name: "Linh Tran".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("companyId").is_some());
        assert!(value.get("applicantId").is_some());
        assert_eq!(value["applicantName"], "Linh Tran");
    }
}
