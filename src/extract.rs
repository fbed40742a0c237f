use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const AUDIT_MARKER: &str = "audit";

static RE_URL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url="([^"]*)""#).unwrap()
});

static RE_CLIENT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    // Address part of `from=ip:port`; stops at the first `:` or whitespace.
    Regex::new(r#"from=([^:\s"]+)"#).unwrap()
});

/// Structured view of one audit record. `endpoint` and `status` may be
/// empty; `id` is always non-empty (records without one produce no event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: String,
    pub stage: String,
    pub timestamp: String,
    pub endpoint: String,
    pub status: String,
}

/// The free-text payload carried by frequency-analysis records.
pub fn text_payload(record: &Value) -> Option<&str> {
    record.get("textPayload").and_then(Value::as_str)
}

/// `url="<value>"` capture with the query string stripped.
pub fn url_token(payload: &str) -> Option<&str> {
    let m = RE_URL_TOKEN.captures(payload)?;
    let value = m.get(1)?.as_str();
    Some(value.split('?').next().unwrap_or(value))
}

/// Address portion of the first `from=<addr>:<port>` token.
pub fn client_token(payload: &str) -> Option<&str> {
    let m = RE_CLIENT_TOKEN.captures(payload)?;
    Some(m.get(1)?.as_str())
}

/// Structured extraction of an audit event. Returns a value only for
/// records tagged with the audit marker; the event timestamp falls back to
/// the record-level `timestamp` when the nested one is absent. Missing
/// optional fields become empty strings, never errors.
pub fn audit_event(record: &Value) -> Option<AuditEvent> {
    let json_payload = record.get("jsonPayload")?;
    if json_payload.get("event_type").and_then(Value::as_str) != Some(AUDIT_MARKER) {
        return None;
    }
    let payload = json_payload.get("payload")?;
    let id = string_field(payload.get("id"))?;
    if id.is_empty() {
        return None;
    }
    let timestamp = string_field(payload.get("timestamp"))
        .filter(|t| !t.is_empty())
        .or_else(|| string_field(record.get("timestamp")))
        .unwrap_or_default();
    Some(AuditEvent {
        id,
        stage: string_field(payload.get("stage")).unwrap_or_default(),
        timestamp,
        endpoint: string_field(payload.get("request").and_then(|r| r.get("endpoint")))
            .unwrap_or_default(),
        status: string_field(payload.get("response").and_then(|r| r.get("status")))
            .unwrap_or_default(),
    })
}

// Log producers are not consistent about quoting; accept both string and
// numeric scalars.
fn string_field(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
