//! Loader for the ZIP-to-CBSA crosswalk reference table.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::errors::CombineError;
use crate::record::{Crosswalk, Fields};

/// Left-pads a ZIP value with zeros to exactly five characters.
///
/// Values already five characters or longer are returned unchanged, never
/// truncated.
pub fn pad_zip(zip: &str) -> String {
    if zip.len() < 5 {
        format!("{zip:0>5}")
    } else {
        zip.to_string()
    }
}

/// Loads the comma-delimited crosswalk file into a map keyed by padded ZIP.
///
/// The full source row is kept as the value; downstream only consumes the
/// `Simplified CBSA` column. Duplicate ZIPs keep the last row seen.
pub fn load(path: &Path) -> Result<Crosswalk> {
    let file = File::open(path)
        .with_context(|| format!("opening crosswalk file {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if !headers.iter().any(|h| h == "ZIP") {
        return Err(CombineError::MissingColumn {
            column: "ZIP",
            file: "crosswalk",
        }
        .into());
    }

    let mut crosswalk = Crosswalk::new();
    for result in rdr.records() {
        let row = result?;
        let fields: Fields = headers
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        let key = pad_zip(&fields["ZIP"]);
        crosswalk.insert(key, fields);
    }

    if crosswalk.is_empty() {
        return Err(CombineError::EmptyReference("CBSA").into());
    }

    info!(records = crosswalk.len(), "CBSA crosswalk loaded");
    Ok(crosswalk)
}
