use crate::extract::AuditEvent;
use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

pub const START_MARKER: &str = "start";

/// One matched start/complete pair. `duration_millis` may be negative when
/// the start stamp is numerically after the completion stamp (clock skew or
/// mis-emitted stages); the value is surfaced, not clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedOperation {
    pub duration_millis: i64,
    pub status: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationStats {
    pub events: usize,
    pub pairs: usize,
    pub unpaired_ids: usize,
    pub ambiguous_pairs: usize,
    pub bad_timestamp_pairs: usize,
}

#[derive(Debug, Default)]
pub struct Correlated {
    pub operations: Vec<CorrelatedOperation>,
    pub stats: CorrelationStats,
}

/// Match audit events into completed operations.
///
/// Events are grouped by id; only groups of exactly two qualify. A lone
/// start is still in flight and an id seen three or more times is a
/// duplicate emission, neither carries a reliable duration. Roles are
/// assigned from the stage marker, never from arrival order, since the log
/// stream may deliver completion before start.
pub fn correlate(events: Vec<AuditEvent>) -> Correlated {
    let mut out = Correlated::default();
    out.stats.events = events.len();

    // BTreeMap keeps id iteration order stable across runs; arrival order
    // within a group is preserved by the push.
    let mut groups: BTreeMap<String, Vec<AuditEvent>> = BTreeMap::new();
    for ev in events {
        groups.entry(ev.id.clone()).or_default().push(ev);
    }

    for (_id, group) in groups {
        if group.len() != 2 {
            out.stats.unpaired_ids += 1;
            continue;
        }
        let mut pair = group.into_iter();
        let (Some(a), Some(b)) = (pair.next(), pair.next()) else {
            continue;
        };
        let (start, complete) = match (is_start(&a.stage), is_start(&b.stage)) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            _ => {
                out.stats.ambiguous_pairs += 1;
                continue;
            }
        };
        let (start_ms, complete_ms) =
            match (stamp_millis(&start.timestamp), stamp_millis(&complete.timestamp)) {
                (Some(s), Some(c)) => (s, c),
                _ => {
                    out.stats.bad_timestamp_pairs += 1;
                    continue;
                }
            };
        out.operations.push(CorrelatedOperation {
            duration_millis: complete_ms - start_ms,
            status: complete.status,
            endpoint: start.endpoint,
        });
    }
    out.stats.pairs = out.operations.len();
    out
}

/// Sort operations by duration descending and keep at most `top_n`. The
/// sort is stable, so equal durations keep correlation order.
pub fn rank_slowest(mut ops: Vec<CorrelatedOperation>, top_n: usize) -> Vec<CorrelatedOperation> {
    ops.sort_by(|a, b| b.duration_millis.cmp(&a.duration_millis));
    ops.truncate(top_n);
    ops
}

// Stage conventions differ in casing across services (`OpStart`,
// `op_start`); match the suffix case-insensitively.
fn is_start(stage: &str) -> bool {
    stage.to_ascii_lowercase().ends_with(START_MARKER)
}

/// Drop the fractional-second component of a `YYYY-MM-DDTHH:MM:SS[.frac]Z`
/// stamp, keeping the zone marker. Truncating to whole seconds is the log
/// source's stated precision; it is idempotent.
pub fn truncate_fraction(ts: &str) -> Cow<'_, str> {
    match ts.find('.') {
        None => Cow::Borrowed(ts),
        Some(dot) => {
            let mut whole = ts[..dot].to_string();
            if ts.ends_with('Z') {
                whole.push('Z');
            }
            Cow::Owned(whole)
        }
    }
}

/// Parse an audit stamp into milliseconds since the Unix epoch. The accepted
/// shape after truncation is exactly `%Y-%m-%dT%H:%M:%SZ`; anything else is
/// `None` and the caller drops the pair.
pub fn stamp_millis(ts: &str) -> Option<i64> {
    let whole = truncate_fraction(ts);
    let ndt = NaiveDateTime::parse_from_str(whole.as_ref(), "%Y-%m-%dT%H:%M:%SZ").ok()?;
    Some(Utc.from_utc_datetime(&ndt).timestamp_millis())
}
