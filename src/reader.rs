use serde_json::Value;
use std::fs;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One input unit that failed to parse. The batch keeps going without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub unit: usize, // 1-based line / element position
    pub error: String,
}

/// The materialized input: records in original order plus the skip list.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<Value>,
    pub skipped: Vec<SkippedUnit>,
}

impl RecordBatch {
    pub fn extend(&mut self, other: RecordBatch) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
    }
}

/// Read a whole source into memory. `-` means stdin.
pub fn load_source(path: &str) -> Result<String, SourceError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| SourceError::Io { path: path.to_string(), source })?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|source| SourceError::Io { path: path.to_string(), source })
}

/// Normalize the two accepted container shapes into one record sequence.
///
/// A top-level JSON array yields its elements; anything else is treated as
/// newline-delimited JSON, one record per line. A truncated array (starts
/// with `[` but does not parse whole) degrades to line mode so that a
/// damaged trailing line costs only itself.
pub fn read_records(input: &str) -> RecordBatch {
    if input.trim_start().starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(input) {
            return RecordBatch { records: items, skipped: Vec::new() };
        }
    }
    read_lines(input)
}

fn read_lines(input: &str) -> RecordBatch {
    let mut batch = RecordBatch::default();
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(v) => batch.records.push(v),
            Err(e) => batch.skipped.push(SkippedUnit { unit: idx + 1, error: e.to_string() }),
        }
    }
    batch
}
