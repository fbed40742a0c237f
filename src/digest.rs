use crate::correlate::{self, CorrelatedOperation, CorrelationStats};
use crate::extract;
use crate::freq::{self, FrequencyEntry};
use crate::reader::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct DigestOptions {
    pub top_n: usize,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestStats {
    pub records: usize,
    pub malformed_units: usize,
    #[serde(flatten)]
    pub correlation: CorrelationStats,
}

/// The three diagnostic summaries over one record batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Digest {
    pub endpoints: Vec<FrequencyEntry>,
    pub clients: Vec<FrequencyEntry>,
    pub slowest: Vec<CorrelatedOperation>,
    pub stats: DigestStats,
}

/// Run the three analyses over a shared, immutable record slice. They have
/// no data dependency on one another, so the endpoint/client rankings and
/// the correlation pass fan out on the rayon pool; an analysis that finds
/// nothing simply yields an empty section.
pub fn digest(batch: &RecordBatch, opts: &DigestOptions) -> Digest {
    let records = &batch.records;
    let (endpoints, (clients, correlated)) = rayon::join(
        || rank_tokens(records, opts.top_n, extract::url_token),
        || {
            rayon::join(
                || rank_tokens(records, opts.top_n, extract::client_token),
                || correlate::correlate(records.iter().filter_map(extract::audit_event).collect()),
            )
        },
    );
    Digest {
        endpoints,
        clients,
        slowest: correlate::rank_slowest(correlated.operations, opts.top_n),
        stats: DigestStats {
            records: records.len(),
            malformed_units: batch.skipped.len(),
            correlation: correlated.stats,
        },
    }
}

fn rank_tokens(
    records: &[Value],
    top_n: usize,
    token: for<'a> fn(&'a str) -> Option<&'a str>,
) -> Vec<FrequencyEntry> {
    freq::rank(
        records
            .iter()
            .filter_map(extract::text_payload)
            .filter_map(token)
            .map(str::to_string),
        top_n,
    )
}
