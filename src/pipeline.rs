//! Single-run orchestration of the combine pipeline.
//!
//! Stages run strictly in order: load both reference tables, join the detail
//! stream, count observations, derive metrics, reduce the ZIP groups, write
//! the three output tables. A run either completes fully or fails fatally;
//! there is no partial-output recovery.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::{aggregate, crosswalk, estimates, joiner, metrics, observations, output};

/// Counts surfaced to the caller for the end-of-run report.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub detail_records: usize,
    pub missing_msa: u64,
    pub missing_estimate: u64,
}

/// Runs the whole pipeline over one detail file.
pub fn run(config: &Config) -> Result<RunReport> {
    let crosswalk = crosswalk::load(&config.crosswalk_path)?;
    let estimates = estimates::load(&config.estimates_path)?;

    let (mut table, counts) = joiner::join(&config.details_path, &crosswalk, &estimates)?;

    let summary = observations::count(&table.records);
    let groups = metrics::compute(&mut table.records, &summary)?;

    let zip1_summary = aggregate::summarize(&groups.zip1);
    let zip2_summary = aggregate::summarize(&groups.zip2);

    info!("Writing output files");
    output::write_enriched(&config.out_path, &table)?;
    output::write_zip_summary(&config.zip1_path, "zip1", &zip1_summary)?;
    output::write_zip_summary(&config.zip2_path, "zip2", &zip2_summary)?;

    Ok(RunReport {
        detail_records: table.records.len(),
        missing_msa: counts.missing_msa,
        missing_estimate: counts.missing_estimate,
    })
}
