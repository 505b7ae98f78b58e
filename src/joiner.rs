//! Best-effort join of the detail stream against both reference tables.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::errors::CombineError;
use crate::record::{
    Crosswalk, DetailRecord, DetailTable, Estimates, Fields, MARKET_AREA_COLUMN, NO_MSA_SENTINEL,
    POLYGON_ID_COLUMN, POSTAL1_COLUMN, POSTAL2_COLUMN, VISIT_DATE_COLUMN,
};

const REQUIRED_COLUMNS: [&str; 4] = [
    POLYGON_ID_COLUMN,
    VISIT_DATE_COLUMN,
    POSTAL1_COLUMN,
    POSTAL2_COLUMN,
];

/// Running tally of per-record lookup misses. Misses are expected and never
/// abort the join; they are only surfaced in the final report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinCounts {
    pub missing_msa: u64,
    pub missing_estimate: u64,
}

/// Streams the tab-delimited detail file, attaching the market-area code and
/// the visitor estimate to each row where the lookups resolve.
///
/// Every input row appears exactly once in the output, in input order.
pub fn join(
    path: &Path,
    crosswalk: &Crosswalk,
    estimates: &Estimates,
) -> Result<(DetailTable, JoinCounts)> {
    let file =
        File::open(path).with_context(|| format!("opening details file {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().delimiter(b'\t').from_reader(file);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            return Err(CombineError::MissingColumn {
                column: required,
                file: "details",
            }
            .into());
        }
    }

    let mut records = Vec::new();
    let mut counts = JoinCounts::default();

    for result in rdr.records() {
        let row = result?;
        let fields: Fields = columns
            .iter()
            .cloned()
            .zip(row.iter().map(str::to_string))
            .collect();
        let mut record = DetailRecord::new(fields);

        // The crosswalk is keyed by zero-padded ZIPs, but this lookup uses
        // the raw postal value: a source ZIP shorter than five characters
        // will not match.
        record.cbsa = match crosswalk
            .get(record.postal1())
            .and_then(|entry| entry.get(MARKET_AREA_COLUMN))
        {
            Some(cbsa) => cbsa.clone(),
            None => {
                counts.missing_msa += 1;
                NO_MSA_SENTINEL.to_string()
            }
        };

        record.estimated_visitors = estimates
            .get(record.polygon_id())
            .and_then(|by_date| by_date.get(record.visit_date()))
            .cloned();
        if record.estimated_visitors.is_none() {
            counts.missing_estimate += 1;
        }

        records.push(record);
    }

    info!(records = records.len(), "Details file loaded");
    Ok((DetailTable { columns, records }, counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn crosswalk_from(rows: &[(&str, &str)]) -> Crosswalk {
        let mut crosswalk = Crosswalk::new();
        for (zip, cbsa) in rows {
            let mut fields = Fields::new();
            fields.insert("ZIP".to_string(), zip.to_string());
            fields.insert(MARKET_AREA_COLUMN.to_string(), cbsa.to_string());
            crosswalk.insert(crate::crosswalk::pad_zip(zip), fields);
        }
        crosswalk
    }

    fn estimates_from(rows: &[(&str, &str, &str)]) -> Estimates {
        let mut estimates = Estimates::new();
        for (polygon, date, value) in rows {
            estimates
                .entry(polygon.to_string())
                .or_insert_with(HashMap::new)
                .insert(date.to_string(), value.to_string());
        }
        estimates
    }

    fn write_details(name: &str, body: &str) -> String {
        let path = temp_path(name);
        let header = "Polygon Id\tVisit Date\tCommon Evening Postal1\tCommon Evening Postal2\tDevice Count\n";
        fs::write(&path, format!("{header}{body}")).unwrap();
        path
    }

    #[test]
    fn test_join_attaches_cbsa_and_estimate() {
        let path = write_details(
            "visit_combiner_join_basic.tsv",
            "P1\t2024-01-05\t60614\t60647\t3\n",
        );
        let crosswalk = crosswalk_from(&[("60614", "CHI")]);
        let estimates = estimates_from(&[("P1", "2024-01-05", "100")]);

        let (table, counts) = join(Path::new(&path), &crosswalk, &estimates).unwrap();

        assert_eq!(table.records.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.cbsa, "CHI");
        assert_eq!(record.estimated_visitors.as_deref(), Some("100"));
        assert_eq!(record.fields["Device Count"], "3");
        assert_eq!(counts, JoinCounts::default());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_join_misses_are_counted_not_fatal() {
        let path = write_details(
            "visit_combiner_join_miss.tsv",
            "P1\t2024-01-05\t99999\t60647\t3\nP2\t2024-01-06\t60614\t60647\t1\n",
        );
        let crosswalk = crosswalk_from(&[("60614", "CHI")]);
        let estimates = estimates_from(&[("P2", "2024-01-06", "40")]);

        let (table, counts) = join(Path::new(&path), &crosswalk, &estimates).unwrap();

        assert_eq!(table.records[0].cbsa, NO_MSA_SENTINEL);
        assert!(table.records[0].estimated_visitors.is_none());
        assert_eq!(table.records[1].cbsa, "CHI");
        assert_eq!(table.records[1].estimated_visitors.as_deref(), Some("40"));
        assert_eq!(counts.missing_msa, 1);
        assert_eq!(counts.missing_estimate, 1);

        fs::remove_file(&path).unwrap();
    }

    // Regression for the key-padding asymmetry: the crosswalk stores `501`
    // under the padded key `00501`, and the join looks up the raw postal
    // value. `501` therefore misses while `00501` matches.
    #[test]
    fn test_join_uses_raw_postal_value() {
        let path = write_details(
            "visit_combiner_join_padding.tsv",
            "P1\t2024-01-05\t501\t501\t1\nP1\t2024-01-05\t00501\t00501\t1\n",
        );
        let crosswalk = crosswalk_from(&[("501", "NY")]);
        let estimates = estimates_from(&[("P9", "2024-01-01", "1")]);

        let (table, counts) = join(Path::new(&path), &crosswalk, &estimates).unwrap();

        assert_eq!(table.records[0].cbsa, NO_MSA_SENTINEL);
        assert_eq!(table.records[1].cbsa, "NY");
        assert_eq!(counts.missing_msa, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_join_crosswalk_entry_without_cbsa_column_misses() {
        let path = write_details(
            "visit_combiner_join_nocbsa.tsv",
            "P1\t2024-01-05\t60614\t60647\t1\n",
        );
        let mut crosswalk = Crosswalk::new();
        let mut fields = Fields::new();
        fields.insert("ZIP".to_string(), "60614".to_string());
        crosswalk.insert("60614".to_string(), fields);
        let estimates = estimates_from(&[("P1", "2024-01-05", "10")]);

        let (table, counts) = join(Path::new(&path), &crosswalk, &estimates).unwrap();

        assert_eq!(table.records[0].cbsa, NO_MSA_SENTINEL);
        assert_eq!(counts.missing_msa, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_join_missing_required_column_fails() {
        let path = temp_path("visit_combiner_join_badheader.tsv");
        fs::write(
            &path,
            "Polygon Id\tVisit Date\tCommon Evening Postal1\nP1\t2024-01-05\t60614\n",
        )
        .unwrap();

        let err = join(
            Path::new(&path),
            &Crosswalk::new(),
            &Estimates::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CombineError>(),
            Some(CombineError::MissingColumn {
                column: POSTAL2_COLUMN,
                ..
            })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_join_preserves_input_order() {
        let path = write_details(
            "visit_combiner_join_order.tsv",
            "P3\t2024-01-05\t1\t1\t1\nP1\t2024-01-05\t2\t2\t2\nP2\t2024-01-05\t3\t3\t3\n",
        );
        let (table, _) = join(
            Path::new(&path),
            &Crosswalk::new(),
            &Estimates::new(),
        )
        .unwrap();

        let ids: Vec<&str> = table.records.iter().map(|r| r.polygon_id()).collect();
        assert_eq!(ids, ["P3", "P1", "P2"]);

        fs::remove_file(&path).unwrap();
    }
}
