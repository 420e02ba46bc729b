use std::collections::BTreeSet;

use crate::core::FlatRecord;

/// Sorted, deduplicated union of every metric key seen across the batch.
/// Pure discovery: calling it again for an unchanged batch yields the same
/// columns in the same order.
pub fn collect_columns(records: &[FlatRecord]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    for record in records {
        for key in record.metrics.keys() {
            seen.insert(key.clone());
        }
    }
    seen.into_iter().collect()
}
