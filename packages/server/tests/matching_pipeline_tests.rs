//! Applicant event consumer tests over mock dependencies.
//!
//! These drive the consumer's per-event pipeline directly (deserialize →
//! directory → match → fan-out emission) and assert on the match events
//! captured by the NATS test double.

mod common;

use common::{applicant, created_payload, profile_for};
use matcher_core::domains::matching::events::{
    ApplicantMatchedEvent, APPLICANT_MATCHED_SUBJECT,
};
use matcher_core::domains::matching::{
    ApplicantEventConsumer, ConsumerSettings, EventOutcome,
};
use matcher_core::kernel::test_dependencies::TestDeps;

fn consumer_with(deps: &TestDeps) -> ApplicantEventConsumer {
    ApplicantEventConsumer::new(&deps.server_deps(), ConsumerSettings::default())
}

#[tokio::test]
async fn test_emits_one_match_event_per_qualifying_company() {
    let deps = TestDeps::new();
    let matching_a = profile_for("VN", &["kafka"]);
    let matching_b = profile_for("vn", &["JAVA"]);
    let wrong_country = profile_for("US", &["java"]);
    deps.directory.set_profiles(vec![
        matching_a.clone(),
        wrong_country.clone(),
        matching_b.clone(),
    ]);

    let snapshot = applicant("VN", &["Java", "Kafka"]);
    let outcome = consumer_with(&deps)
        .process(&created_payload(&snapshot))
        .await;

    assert_eq!(
        outcome,
        EventOutcome::Completed {
            matched: 2,
            emitted: 2
        }
    );

    let messages = deps.nats.messages_for_subject(APPLICANT_MATCHED_SUBJECT);
    assert_eq!(messages.len(), 2);

    let mut notified: Vec<ApplicantMatchedEvent> = messages
        .iter()
        .map(|m| deps.nats.deserialize_message(m).unwrap())
        .collect();
    notified.sort_by_key(|e| e.company_id);
    let mut expected = vec![matching_a.company_id, matching_b.company_id];
    expected.sort();

    assert_eq!(
        notified.iter().map(|e| e.company_id).collect::<Vec<_>>(),
        expected
    );
    for event in &notified {
        assert_eq!(event.applicant_id, snapshot.applicant_id);
        assert_eq!(event.applicant_name, "Linh Tran");
    }
}

#[tokio::test]
async fn test_zero_matches_is_a_valid_terminal_outcome() {
    let deps = TestDeps::new();
    deps.directory
        .set_profiles(vec![profile_for("US", &["go"])]);

    let outcome = consumer_with(&deps)
        .process(&created_payload(&applicant("VN", &["java"])))
        .await;

    assert_eq!(
        outcome,
        EventOutcome::Completed {
            matched: 0,
            emitted: 0
        }
    );
    assert!(!deps.nats.was_published_to(APPLICANT_MATCHED_SUBJECT));
}

#[tokio::test]
async fn test_empty_directory_is_not_an_error() {
    let deps = TestDeps::new();

    let outcome = consumer_with(&deps)
        .process(&created_payload(&applicant("VN", &["java"])))
        .await;

    assert_eq!(
        outcome,
        EventOutcome::Completed {
            matched: 0,
            emitted: 0
        }
    );
}

#[tokio::test]
async fn test_malformed_payload_is_dropped_without_directory_call() {
    let deps = TestDeps::new();

    let outcome = consumer_with(&deps).process(b"{not json").await;

    assert!(matches!(outcome, EventOutcome::Dropped { .. }));
    assert_eq!(deps.directory.call_count(), 0);
    assert!(deps.nats.published_messages().is_empty());
}

#[tokio::test]
async fn test_directory_outage_is_retryable_not_zero_matches() {
    let deps = TestDeps::new();
    deps.directory.set_profiles(vec![profile_for("VN", &["java"])]);
    deps.directory.fail_with_timeout();

    let consumer = consumer_with(&deps);
    let snapshot = applicant("VN", &["java"]);
    let payload = created_payload(&snapshot);

    let outcome = consumer.process(&payload).await;
    assert!(matches!(outcome, EventOutcome::Retry { .. }));
    assert!(deps.nats.published_messages().is_empty());

    // Unreachable behaves the same as a timeout.
    deps.directory.fail_with_unavailable();
    assert!(matches!(
        consumer.process(&payload).await,
        EventOutcome::Retry { .. }
    ));

    // Once the directory recovers, the redelivered event matches normally.
    deps.directory.succeed();
    assert_eq!(
        consumer.process(&payload).await,
        EventOutcome::Completed {
            matched: 1,
            emitted: 1
        }
    );
}

#[tokio::test]
async fn test_one_company_emission_failure_does_not_abort_the_rest() {
    let deps = TestDeps::new();
    let healthy_a = profile_for("VN", &["java"]);
    let failing = profile_for("VN", &["java"]);
    let healthy_b = profile_for("VN", &["java"]);
    deps.directory.set_profiles(vec![
        healthy_a.clone(),
        failing.clone(),
        healthy_b.clone(),
    ]);
    // Fail every publish whose payload names the middle company.
    deps.nats
        .fail_payloads_containing(&failing.company_id.to_string());

    let outcome = consumer_with(&deps)
        .process(&created_payload(&applicant("VN", &["java"])))
        .await;

    // The batch still completes and is ack-able; only the faulty company is
    // counted out.
    assert_eq!(
        outcome,
        EventOutcome::Completed {
            matched: 3,
            emitted: 2
        }
    );

    let delivered: Vec<ApplicantMatchedEvent> = deps
        .nats
        .messages_for_subject(APPLICANT_MATCHED_SUBJECT)
        .iter()
        .map(|m| deps.nats.deserialize_message(m).unwrap())
        .collect();
    assert_eq!(delivered.len(), 2);
    assert!(delivered
        .iter()
        .all(|e| e.company_id != failing.company_id));
}

#[tokio::test]
async fn test_reprocessing_the_same_event_republishes() {
    // The publisher does not dedupe; at-least-once is deliberate and the
    // sink's pair-keyed upsert downstream absorbs the duplicates.
    let deps = TestDeps::new();
    deps.directory.set_profiles(vec![profile_for("VN", &["java"])]);

    let consumer = consumer_with(&deps);
    let payload = created_payload(&applicant("VN", &["java"]));
    consumer.process(&payload).await;
    consumer.process(&payload).await;

    assert_eq!(deps.nats.publish_count_for(APPLICANT_MATCHED_SUBJECT), 2);
}
