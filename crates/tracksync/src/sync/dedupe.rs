//! In-batch deduplication by natural key.

use std::collections::HashSet;
use std::hash::Hash;

/// Collapse repeated keys in a batch, keeping the first occurrence.
///
/// Single pass, order-preserving, O(n) with a set of seen keys. Safe to
/// apply repeatedly since the downstream upsert is idempotent; dedup only
/// reduces redundant writes.
pub fn dedupe_by_key<T, K, F>(records: Vec<T>, key_fn: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(key_fn(record)))
        .collect()
}
