use tracing::debug;

use crate::results::{MatchRecord, ScanOutcome};

/// Joins per-unit outcomes into one ordered result.
///
/// Outcomes arrive in whatever order the units finished; concatenation is
/// followed by the deterministic ordering below, so the same multiset of
/// records always produces the same list. Nothing is deduplicated.
pub fn aggregate(outcomes: Vec<ScanOutcome>) -> ScanOutcome {
    let mut merged = ScanOutcome::new();
    for outcome in outcomes {
        merged.merge(outcome);
    }
    order_records(&mut merged.records);

    debug!(
        "Aggregated {} records, {} diagnostics",
        merged.records.len(),
        merged.diagnostics.len()
    );
    merged
}

/// Applies the output ordering contract: ascending path string length,
/// then ascending line number.
///
/// The primary key really is the LENGTH of the path, not lexicographic
/// order; downstream consumers depend on that exact ordering, so it must
/// not be changed to an alphabetical sort. The key pair is a consistent
/// total order, so any arrival order of the same record multiset sorts
/// to the same list; records with identical keys keep their relative
/// arrival order (the sort is stable).
pub fn order_records(records: &mut [MatchRecord]) {
    records.sort_by_key(|record| (record.path_len(), record.line_number));
}
