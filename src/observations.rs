use crate::record::{DetailRecord, ObservationSummary};

/// Counts detail records per (polygon id, visit date) pair.
///
/// Pure group-by-count over the joined records; the result is independent of
/// record order.
pub fn count(records: &[DetailRecord]) -> ObservationSummary {
    let mut summary = ObservationSummary::new();
    for record in records {
        *summary
            .entry(record.polygon_id().to_string())
            .or_default()
            .entry(record.visit_date().to_string())
            .or_insert(0) += 1;
    }
    summary
}
