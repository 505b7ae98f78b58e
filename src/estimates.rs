//! Loader for the per-polygon, per-date visitor estimate table.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::errors::CombineError;
use crate::record::Estimates;

#[derive(Debug, Deserialize)]
struct EstimateRow {
    polygon_id: String,
    local_date: String,
    estimated_visitors: String,
}

/// Loads the tab-delimited estimates file into a nested map
/// `[polygon_id][local_date] -> estimated_visitors`.
///
/// Duplicate (polygon, date) pairs keep the last row seen. Any row that does
/// not match the expected schema aborts the load.
pub fn load(path: &Path) -> Result<Estimates> {
    let file = File::open(path)
        .with_context(|| format!("opening estimates file {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().delimiter(b'\t').from_reader(file);

    let mut estimates = Estimates::new();
    for result in rdr.deserialize() {
        let row: EstimateRow = result.map_err(CombineError::EstimatesFormat)?;
        estimates
            .entry(row.polygon_id)
            .or_default()
            .insert(row.local_date, row.estimated_visitors);
    }

    if estimates.is_empty() {
        return Err(CombineError::EmptyReference("Estimates").into());
    }

    info!(polygons = estimates.len(), "Estimates file loaded");
    Ok(estimates)
}
