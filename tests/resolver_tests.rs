use std::sync::Arc;

use appointment_notifier::{models::appointment::AppointmentEvent, resolver::RecordResolver};
use serde_json::json;

use crate::common::{DOCTOR_COL, FakeStore, PATIENT_COL, collection_settings};

fn resolver(store: Arc<FakeStore>) -> RecordResolver {
    RecordResolver::new(store, collection_settings())
}

/// Test: patients are looked up by the external user id field
#[tokio::test]
async fn test_patient_resolved_by_user_field() {
    let store = Arc::new(FakeStore::new().with_field_match(
        PATIENT_COL,
        "userId",
        "u1",
        json!({"name": "Jane", "phone": 5550100, "address": ""}),
    ));

    let patient = resolver(store.clone()).resolve_patient("u1").await.unwrap();

    assert_eq!(patient.name.as_deref(), Some("Jane"));
    assert_eq!(patient.phone.as_deref(), Some("5550100"));
    assert_eq!(patient.address, None);
    assert_eq!(store.calls_for(PATIENT_COL).len(), 1);
}

/// Test: a patient stored under the document id only is not resolved
#[tokio::test]
async fn test_patient_not_looked_up_by_document_id() {
    let store = Arc::new(FakeStore::new().with_document(PATIENT_COL, "u1", json!({"name": "Jane"})));

    let patient = resolver(store.clone()).resolve_patient("u1").await;

    assert_eq!(patient, None);
    assert_eq!(store.calls_for(PATIENT_COL)[0].0, "query_by_field");
}

/// Test: an unknown doctor costs exactly two lookups and resolves to none
#[tokio::test]
async fn test_unknown_doctor_tries_both_strategies_once() {
    let store = Arc::new(FakeStore::new());

    let doctor = resolver(store.clone()).resolve_doctor("d404").await;

    assert_eq!(doctor, None);
    let calls = store.calls_for(DOCTOR_COL);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ("get_by_id", DOCTOR_COL.to_string(), "d404".to_string()));
    assert_eq!(
        calls[1],
        ("query_by_field", DOCTOR_COL.to_string(), "doctorId=d404".to_string())
    );
}

/// Test: a failing fallback query after a missing id resolves the doctor to none
#[tokio::test]
async fn test_doctor_query_outage_after_not_found() {
    let store = Arc::new(FakeStore::new().failing_queries(DOCTOR_COL));

    let doctor = resolver(store.clone()).resolve_doctor("d404").await;

    assert_eq!(doctor, None);
    let calls = store.calls_for(DOCTOR_COL);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "get_by_id");
    assert_eq!(calls[1].0, "query_by_field");
}

/// Test: resolution runs both lookups and keeps the event intact
#[tokio::test]
async fn test_resolve_bundles_event_and_records() {
    let store = Arc::new(
        FakeStore::new()
            .with_document(DOCTOR_COL, "d1", json!({"name": "Dr. Lee", "clinicPhone": "555-0200"}))
            .failing(PATIENT_COL),
    );
    let event =
        AppointmentEvent::normalize(&json!({"id": "a1", "userId": "u1", "doctorId": "d1"})).unwrap();

    let context = resolver(store).resolve(event.clone()).await;

    assert_eq!(context.event, event);
    assert_eq!(context.patient, None);
    let doctor = context.doctor.unwrap();
    assert_eq!(doctor.name.as_deref(), Some("Dr. Lee"));
    assert_eq!(doctor.clinic_phone.as_deref(), Some("555-0200"));
}
