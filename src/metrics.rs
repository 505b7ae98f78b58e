//! Per-record metric derivation: observed visit counts, the normalized
//! near-estimated-visits value, and calendar date parts.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::debug;

use crate::errors::CombineError;
use crate::record::{DetailRecord, ObservationSummary};

const PROGRESS_INTERVAL: usize = 250_000;

/// Per-ZIP lists of near-estimated-visits values, one map per postal column.
/// Keys appear in first-contribution order.
#[derive(Debug, Default)]
pub struct ZipGroups {
    pub zip1: IndexMap<String, Vec<f64>>,
    pub zip2: IndexMap<String, Vec<f64>>,
}

/// Enriches every record in place and accumulates the normalized metric into
/// both ZIP groupings.
///
/// A record with no estimate, a non-numeric estimate, or a zero observed
/// count simply gets no `near_estimated_visits` and contributes to neither
/// group. A malformed visit date aborts the run; the date format is assumed
/// uniform across the file.
pub fn compute(
    records: &mut [DetailRecord],
    summary: &ObservationSummary,
) -> Result<ZipGroups> {
    let mut groups = ZipGroups::default();

    for (idx, record) in records.iter_mut().enumerate() {
        let observed = *summary
            .get(record.polygon_id())
            .and_then(|by_date| by_date.get(record.visit_date()))
            .ok_or_else(|| CombineError::MissingObservation {
                polygon: record.polygon_id().to_string(),
                date: record.visit_date().to_string(),
            })?;
        record.observed_visits = observed;

        if observed > 0 {
            if let Some(estimate) = record
                .estimated_visitors
                .as_deref()
                .and_then(|v| v.parse::<i64>().ok())
            {
                let near = estimate as f64 / observed as f64;
                record.near_estimated_visits = Some(near);
                groups
                    .zip1
                    .entry(record.postal1().to_string())
                    .or_default()
                    .push(near);
                groups
                    .zip2
                    .entry(record.postal2().to_string())
                    .or_default()
                    .push(near);
            }
        }

        let date = record.visit_date().to_string();
        let mut parts = date.split('-');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(year), Some(month), Some(day), None) => {
                record.year = year.to_string();
                record.month = month.to_string();
                record.day = day.to_string();
            }
            _ => return Err(CombineError::BadVisitDate(date).into()),
        }

        if idx % PROGRESS_INTERVAL == 0 {
            debug!(rows = idx, "Metric pass progress");
        }
    }

    Ok(groups)
}
