//! End-to-end dispatch tests over an in-memory store.
//!
//! Each test drives the full path a message takes in production:
//! topic classification, normalization, persistence, and (for
//! requests) envelope shaping and reply-topic resolution.

use serde_json::{Value, json};

use homelog_service::handle_message;
use homelog_store::Store;

fn envelope(payload: &[u8]) -> Value {
    serde_json::from_slice(payload).unwrap()
}

#[test]
fn temperature_ingest_then_query_round_trip() {
    let store = Store::open_in_memory().unwrap();

    let ingest = handle_message(
        &store,
        "home/temperature",
        br#"{"device_id":"t1","temperature":22.5,"humidity":45.3,"status":"HIGH","timestamp":"2026-01-22T14:30:00"}"#,
    );
    assert!(ingest.is_none());

    let response = handle_message(
        &store,
        "home/gettemp/c1",
        br#"{"device_id":"t1","date":"2026-01-22"}"#,
    )
    .expect("well-formed query must be answered");

    assert_eq!(response.topic, "home/datatemp/c1");
    assert_eq!(
        envelope(&response.payload),
        json!({
            "device_id": "t1",
            "date": "2026-01-22",
            "count": 1,
            "records": [{
                "temperature": 22.5,
                "humidity": 45.3,
                "status": "HIGH",
                "timestamp": "2026-01-22T14:30:00",
            }],
        })
    );
}

#[test]
fn power_tokens_stored_as_partial_records_in_order() {
    let store = Store::open_in_memory().unwrap();

    handle_message(
        &store,
        "home/power",
        br#"{"device_id":"p1","status":"EB_ON","timestamp":"2026-01-22T10:00:00"}"#,
    );
    handle_message(
        &store,
        "home/power",
        br#"{"device_id":"p1","status":"DG_OFF","timestamp":"2026-01-22T11:00:00"}"#,
    );

    let response = handle_message(
        &store,
        "home/getpower/c1",
        br#"{"device_id":"p1","date":"2026-01-22"}"#,
    )
    .unwrap();

    let body = envelope(&response.payload);
    assert_eq!(body["count"], 2);

    // Per-message partial records, timestamp order, no merging of
    // prior state.
    let records = body["records"].as_array().unwrap();
    assert_eq!(records[0]["ebstatus"], "ON");
    assert_eq!(records[0]["dgstatus"], "");
    assert_eq!(records[1]["ebstatus"], "");
    assert_eq!(records[1]["dgstatus"], "OFF");
}

#[test]
fn malformed_fingerprint_is_dropped_and_query_sees_nothing() {
    let store = Store::open_in_memory().unwrap();

    // Missing authStatus: dropped, nothing stored.
    let ingest = handle_message(
        &store,
        "home/fingerprint",
        br#"{"device_id":"f1","user_id":"u7","timestamp":"2026-01-22T08:00:00"}"#,
    );
    assert!(ingest.is_none());

    // A well-formed request over the empty dataset still gets an
    // envelope, with count 0.
    let response = handle_message(
        &store,
        "home/getfingerprint/c1",
        br#"{"device_id":"f1","date":"2026-01-22"}"#,
    )
    .unwrap();

    let body = envelope(&response.payload);
    assert_eq!(body["count"], 0);
    assert_eq!(body["records"], json!([]));
}

#[test]
fn fingerprint_envelope_uses_device_facing_key() {
    let store = Store::open_in_memory().unwrap();

    handle_message(
        &store,
        "home/fingerprint",
        br#"{"device_id":"f1","user_id":"u7","authStatus":"FAIL","timestamp":"2026-01-22T08:00:00"}"#,
    );

    let response = handle_message(
        &store,
        "home/getfingerprint/c9",
        br#"{"device_id":"f1","date":"2026-01-22"}"#,
    )
    .unwrap();

    assert_eq!(response.topic, "home/datafingerprint/c9");
    let record = &envelope(&response.payload)["records"][0];
    assert_eq!(record["authStatus"], "FAIL");
    assert_eq!(record["user_id"], "u7");
}

#[test]
fn malformed_requests_are_dropped_silently() {
    let store = Store::open_in_memory().unwrap();

    // Missing date, missing device_id, bad date format, broken JSON:
    // none of them may produce a response.
    for payload in [
        br#"{"device_id":"t1"}"#.as_slice(),
        br#"{"date":"2026-01-22"}"#.as_slice(),
        br#"{"device_id":"t1","date":"01/22/2026"}"#.as_slice(),
        b"not json".as_slice(),
    ] {
        assert!(handle_message(&store, "home/gettemp/c1", payload).is_none());
    }
}

#[test]
fn unknown_topics_are_ignored() {
    let store = Store::open_in_memory().unwrap();

    assert!(handle_message(&store, "home/lighting", b"{}").is_none());
    assert!(handle_message(&store, "home/gettemp", b"{}").is_none());
}

#[test]
fn queries_are_scoped_to_device_and_date() {
    let store = Store::open_in_memory().unwrap();

    for (device, ts) in [
        ("a", "2026-01-22T10:00:00"),
        ("a", "2026-01-23T10:00:00"),
        ("b", "2026-01-22T10:00:00"),
    ] {
        let payload = format!(
            r#"{{"device_id":"{}","temperature":20.0,"humidity":50.0,"timestamp":"{}"}}"#,
            device, ts
        );
        handle_message(&store, "home/temperature", payload.as_bytes());
    }

    let response = handle_message(
        &store,
        "home/gettemp/c1",
        br#"{"device_id":"a","date":"2026-01-22"}"#,
    )
    .unwrap();

    let body = envelope(&response.payload);
    assert_eq!(body["count"], 1);
    assert_eq!(
        body["records"][0]["timestamp"],
        "2026-01-22T10:00:00"
    );
}

#[test]
fn responses_are_partitioned_per_client() {
    let store = Store::open_in_memory().unwrap();

    handle_message(
        &store,
        "home/temperature",
        br#"{"device_id":"t1","temperature":21.0,"humidity":40.0,"timestamp":"2026-01-22T09:00:00"}"#,
    );

    let request = br#"{"device_id":"t1","date":"2026-01-22"}"#;
    let first = handle_message(&store, "home/gettemp/client-one", request).unwrap();
    let second = handle_message(&store, "home/gettemp/client-two", request).unwrap();

    assert_eq!(first.topic, "home/datatemp/client-one");
    assert_eq!(second.topic, "home/datatemp/client-two");
    assert_eq!(envelope(&first.payload), envelope(&second.payload));
}
