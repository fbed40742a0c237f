use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Count occurrences per distinct value and return at most `top_n` entries,
/// count descending. Equality is exact string match. Ties break by first
/// occurrence in the input, which keeps output stable across runs.
pub fn rank<I>(values: I, top_n: usize) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: AHashMap<String, (usize, usize)> = AHashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        let entry = counts.entry(value).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .sorted_by(|(_, (ca, fa)), (_, (cb, fb))| cb.cmp(ca).then_with(|| fa.cmp(fb)))
        .take(top_n)
        .map(|(value, (count, _))| FrequencyEntry { value, count })
        .collect()
}
