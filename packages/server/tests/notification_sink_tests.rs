//! Notification sink tests over mock dependencies.
//!
//! Exercise the idempotent upsert contract and the persistence/push split:
//! a duplicate match event never creates a second visible notification or a
//! second push, and a push failure never loses the persisted row.

mod common;

use common::{applicant, created_payload, matched_payload, profile_for};
use matcher_core::domains::matching::{
    ApplicantEventConsumer, ConsumerSettings, NotificationSink, SinkOutcome,
};
use matcher_core::kernel::test_dependencies::TestDeps;
use matcher_core::kernel::BaseNotificationStore;
use uuid::Uuid;

fn sink_with(deps: &TestDeps) -> NotificationSink {
    NotificationSink::new(&deps.server_deps(), 5)
}

#[tokio::test]
async fn test_first_delivery_persists_and_pushes() {
    let deps = TestDeps::new();
    let sink = sink_with(&deps);
    let company_id = Uuid::new_v4();
    let applicant_id = Uuid::new_v4();

    let outcome = sink
        .process(&matched_payload(company_id, applicant_id, "Linh Tran"))
        .await;

    assert_eq!(outcome, SinkOutcome::Created);

    let stored = deps.store.get(company_id, applicant_id).expect("row exists");
    assert_eq!(stored.applicant_name, "Linh Tran");
    assert!(!stored.read);
    assert!(stored.message.contains("Linh Tran"));

    let pushes = deps.push.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].0, company_id);
    assert_eq!(pushes[0].1.id, stored.id);
    assert_eq!(deps.push.broadcast_count(), 1);
}

#[tokio::test]
async fn test_duplicate_delivery_is_idempotent() {
    let deps = TestDeps::new();
    let sink = sink_with(&deps);
    let company_id = Uuid::new_v4();
    let applicant_id = Uuid::new_v4();
    let payload = matched_payload(company_id, applicant_id, "Linh Tran");

    assert_eq!(sink.process(&payload).await, SinkOutcome::Created);
    let first = deps.store.get(company_id, applicant_id).unwrap();

    // Out-of-order redelivery of the same pair: no new row, no second push,
    // created_at stays the first successfully processed event's time.
    assert_eq!(sink.process(&payload).await, SinkOutcome::Duplicate);

    let after = deps.store.get(company_id, applicant_id).unwrap();
    assert_eq!(deps.store.len(), 1);
    assert_eq!(after.id, first.id);
    assert_eq!(after.created_at, first.created_at);
    assert_eq!(deps.push.push_count(), 1);
    assert_eq!(deps.push.broadcast_count(), 1);
}

#[tokio::test]
async fn test_push_failure_never_rolls_back_the_row() {
    let deps = TestDeps::new();
    let sink = sink_with(&deps);
    deps.push.set_fail(true);
    let company_id = Uuid::new_v4();
    let applicant_id = Uuid::new_v4();

    let outcome = sink
        .process(&matched_payload(company_id, applicant_id, "Linh Tran"))
        .await;

    // Push is best-effort: the event still completes and the row stays.
    assert_eq!(outcome, SinkOutcome::Created);
    assert!(deps.store.get(company_id, applicant_id).is_some());
    assert_eq!(deps.push.push_count(), 0);
}

#[tokio::test]
async fn test_store_outage_is_retryable_and_pushes_nothing() {
    let deps = TestDeps::new();
    let sink = sink_with(&deps);
    deps.store.set_fail(true);
    let payload = matched_payload(Uuid::new_v4(), Uuid::new_v4(), "Linh Tran");

    assert!(matches!(
        sink.process(&payload).await,
        SinkOutcome::Retry { .. }
    ));
    assert_eq!(deps.push.push_count(), 0);

    // Redelivery after recovery creates normally.
    deps.store.set_fail(false);
    assert_eq!(sink.process(&payload).await, SinkOutcome::Created);
}

#[tokio::test]
async fn test_malformed_match_event_is_dropped() {
    let deps = TestDeps::new();
    let sink = sink_with(&deps);

    let outcome = sink.process(b"not json at all").await;

    assert!(matches!(outcome, SinkOutcome::Dropped { .. }));
    assert!(deps.store.is_empty());
}

#[tokio::test]
async fn test_consumer_to_sink_end_to_end_with_duplicates() {
    // Full pipeline over mocks: one applicant event fans out to two match
    // events; replaying the applicant event doubles the match events but the
    // sink still persists exactly one notification per pair.
    let deps = TestDeps::new();
    let profile_a = profile_for("VN", &["java"]);
    let profile_b = profile_for("VN", &["kafka"]);
    deps.directory
        .set_profiles(vec![profile_a.clone(), profile_b.clone()]);

    let consumer = ApplicantEventConsumer::new(&deps.server_deps(), ConsumerSettings::default());
    let sink = sink_with(&deps);

    let payload = created_payload(&applicant("VN", &["Java", "Kafka"]));
    consumer.process(&payload).await;
    consumer.process(&payload).await;

    let match_events = deps.nats.published_messages();
    assert_eq!(match_events.len(), 4);

    for message in &match_events {
        sink.process(&message.payload).await;
    }

    assert_eq!(deps.store.len(), 2);
    assert_eq!(deps.push.push_count(), 2);

    let for_a = deps
        .store
        .list_for_company(profile_a.company_id)
        .await
        .unwrap();
    assert_eq!(for_a.len(), 1);
}
