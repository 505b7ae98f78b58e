//! CSV output for the enriched detail table and the two ZIP summaries.

use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

use crate::pipeline::RunReport;
use crate::record::DetailTable;

/// Columns the pipeline appends after the source detail columns, in output
/// order. Declared once so every row carries the identical column set.
pub const ENRICHMENT_COLUMNS: [&str; 7] = [
    "CBSA",
    "estimated_visitors",
    "observed_visits",
    "near_estimated_visits",
    "year",
    "month",
    "day",
];

/// Writes the enriched detail table as comma-delimited CSV.
///
/// Optional fields that were never set are written as empty strings.
pub fn write_enriched(path: &Path, table: &DetailTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let header: Vec<&str> = table
        .columns
        .iter()
        .map(String::as_str)
        .chain(ENRICHMENT_COLUMNS)
        .collect();
    writer.write_record(&header)?;

    for record in &table.records {
        let mut row: Vec<String> = table
            .columns
            .iter()
            .map(|column| record.fields.get(column).cloned().unwrap_or_default())
            .collect();
        row.push(record.cbsa.clone());
        row.push(record.estimated_visitors.clone().unwrap_or_default());
        row.push(record.observed_visits.to_string());
        row.push(
            record
                .near_estimated_visits
                .map(|v| v.to_string())
                .unwrap_or_default(),
        );
        row.push(record.year.clone());
        row.push(record.month.clone());
        row.push(record.day.clone());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a two-column ZIP summary table, rows in map insertion order.
pub fn write_zip_summary(
    path: &Path,
    key_column: &str,
    summary: &IndexMap<String, f64>,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([key_column, "near_estimated_visits"])?;
    for (zip, total) in summary {
        writer.write_record([zip.as_str(), total.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Logs the end-of-run report: total records and both join-miss tallies.
pub fn log_final_report(report: &RunReport) {
    info!("Final Report");
    info!(count = report.detail_records, "Detailed records processed");
    info!(count = report.missing_msa, "Records with no MSA");
    info!(count = report.missing_estimate, "Records with no estimate");
}
