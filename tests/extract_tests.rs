use logdigest::extract;
use serde_json::json;

#[test]
fn url_token_is_captured_and_query_stripped() {
    let payload = r#"request handled url="/v1/health?token=abc" from=10.0.0.5:51342"#;
    assert_eq!(extract::url_token(payload), Some("/v1/health"));
}

#[test]
fn url_token_without_query_passes_through() {
    let payload = r#"url="/v1/kv" status=200"#;
    assert_eq!(extract::url_token(payload), Some("/v1/kv"));
}

#[test]
fn url_token_absent_means_no_match() {
    assert_eq!(extract::url_token("plain message with no tokens"), None);
    assert_eq!(extract::url_token(""), None);
}

#[test]
fn client_token_drops_the_port() {
    let payload = r#"request handled url="/v1/health?token=abc" from=10.0.0.5:51342"#;
    assert_eq!(extract::client_token(payload), Some("10.0.0.5"));
}

#[test]
fn client_token_without_port_still_matches() {
    assert_eq!(extract::client_token("from=10.0.0.9 retries=2"), Some("10.0.0.9"));
}

#[test]
fn client_token_absent_means_no_match() {
    assert_eq!(extract::client_token("url=\"/v1/kv\""), None);
}

#[test]
fn text_payload_accessor_tolerates_absence() {
    assert_eq!(extract::text_payload(&json!({"textPayload": "hello"})), Some("hello"));
    assert_eq!(extract::text_payload(&json!({"other": 1})), None);
    assert_eq!(extract::text_payload(&json!({"textPayload": 42})), None);
}

#[test]
fn audit_event_extracts_nested_fields() {
    let record = json!({
        "jsonPayload": {
            "event_type": "audit",
            "payload": {
                "id": "op-1",
                "stage": "OpStart",
                "timestamp": "2025-01-01T00:00:00Z",
                "request": {"endpoint": "/v1/kv"},
                "response": {"status": "200"}
            }
        }
    });
    let ev = extract::audit_event(&record).expect("audit event");
    assert_eq!(ev.id, "op-1");
    assert_eq!(ev.stage, "OpStart");
    assert_eq!(ev.timestamp, "2025-01-01T00:00:00Z");
    assert_eq!(ev.endpoint, "/v1/kv");
    assert_eq!(ev.status, "200");
}

#[test]
fn audit_timestamp_falls_back_to_record_level() {
    let record = json!({
        "timestamp": "2025-01-01T00:00:05Z",
        "jsonPayload": {
            "event_type": "audit",
            "payload": {"id": "op-2", "stage": "OpComplete"}
        }
    });
    let ev = extract::audit_event(&record).expect("audit event");
    assert_eq!(ev.timestamp, "2025-01-01T00:00:05Z");
    assert_eq!(ev.endpoint, "");
    assert_eq!(ev.status, "");
}

#[test]
fn non_audit_records_yield_nothing() {
    assert!(extract::audit_event(&json!({"textPayload": "x"})).is_none());
    assert!(extract::audit_event(&json!({"jsonPayload": {"event_type": "metric"}})).is_none());
    assert!(extract::audit_event(&json!({"jsonPayload": {"payload": {"id": "x"}}})).is_none());
}

#[test]
fn audit_event_without_id_is_dropped() {
    let record = json!({
        "jsonPayload": {
            "event_type": "audit",
            "payload": {"stage": "OpStart", "timestamp": "2025-01-01T00:00:00Z"}
        }
    });
    assert!(extract::audit_event(&record).is_none());

    let record = json!({
        "jsonPayload": {"event_type": "audit", "payload": {"id": "", "stage": "OpStart"}}
    });
    assert!(extract::audit_event(&record).is_none());
}

#[test]
fn numeric_scalars_are_stringified() {
    let record = json!({
        "jsonPayload": {
            "event_type": "audit",
            "payload": {
                "id": 1234,
                "stage": "OpComplete",
                "timestamp": "2025-01-01T00:00:00Z",
                "response": {"status": 500}
            }
        }
    });
    let ev = extract::audit_event(&record).expect("audit event");
    assert_eq!(ev.id, "1234");
    assert_eq!(ev.status, "500");
}
