//! Fatal error taxonomy for the combine pipeline.
//!
//! Per-record lookup misses are not errors; they surface as `Option` values
//! counted at the call site. Everything here aborts the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CombineError {
    /// A reference table loaded with zero entries.
    #[error("{0} file loaded zero records")]
    EmptyReference(&'static str),

    /// The estimates table does not match its expected schema.
    #[error("Estimates File is not as expected")]
    EstimatesFormat(#[source] csv::Error),

    /// A required column is absent from an input file's header.
    #[error("required column '{column}' missing from {file} file")]
    MissingColumn {
        column: &'static str,
        file: &'static str,
    },

    /// A visit date did not split into exactly year, month, and day.
    #[error("malformed visit date '{0}': expected YYYY-MM-DD")]
    BadVisitDate(String),

    /// The observation summary lacks an entry for a record it was built from.
    #[error("no observation count for polygon '{polygon}' on {date}")]
    MissingObservation { polygon: String, date: String },
}
