//! Data types shared across the combine pipeline.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Column holding the market-area code in the crosswalk file.
pub const MARKET_AREA_COLUMN: &str = "Simplified CBSA";
/// CBSA value assigned when the crosswalk lookup fails.
pub const NO_MSA_SENTINEL: &str = "NO MSA ASSIGNED";

pub const POLYGON_ID_COLUMN: &str = "Polygon Id";
pub const VISIT_DATE_COLUMN: &str = "Visit Date";
pub const POSTAL1_COLUMN: &str = "Common Evening Postal1";
pub const POSTAL2_COLUMN: &str = "Common Evening Postal2";

/// One row of a header-keyed CSV file, columns in source order.
pub type Fields = IndexMap<String, String>;

/// Padded five-digit ZIP -> full crosswalk row.
pub type Crosswalk = IndexMap<String, Fields>;

/// Polygon id -> visit date -> estimated visitor count (kept as the source string).
pub type Estimates = HashMap<String, HashMap<String, String>>;

/// Polygon id -> visit date -> number of detail records observed.
pub type ObservationSummary = HashMap<String, HashMap<String, u64>>;

/// A detail row plus the enrichment fields added by the pipeline stages.
///
/// `observed_visits` and the date parts are filled in by the metric pass;
/// until then they hold their zero values.
#[derive(Debug, Clone)]
pub struct DetailRecord {
    /// Source detail columns, passed through untouched.
    pub fields: Fields,
    pub cbsa: String,
    pub estimated_visitors: Option<String>,
    pub observed_visits: u64,
    pub near_estimated_visits: Option<f64>,
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DetailRecord {
    pub fn new(fields: Fields) -> Self {
        DetailRecord {
            fields,
            cbsa: String::new(),
            estimated_visitors: None,
            observed_visits: 0,
            near_estimated_visits: None,
            year: String::new(),
            month: String::new(),
            day: String::new(),
        }
    }

    pub fn polygon_id(&self) -> &str {
        self.field(POLYGON_ID_COLUMN)
    }

    pub fn visit_date(&self) -> &str {
        self.field(VISIT_DATE_COLUMN)
    }

    pub fn postal1(&self) -> &str {
        self.field(POSTAL1_COLUMN)
    }

    pub fn postal2(&self) -> &str {
        self.field(POSTAL2_COLUMN)
    }

    fn field(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }
}

/// The joined detail table: the source header plus one record per input row,
/// in input order. The header is carried explicitly so the output schema is
/// declared once rather than inferred from the first record.
#[derive(Debug)]
pub struct DetailTable {
    pub columns: Vec<String>,
    pub records: Vec<DetailRecord>,
}
