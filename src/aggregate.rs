use indexmap::IndexMap;

/// Reduces a ZIP grouping to per-ZIP sums. Keys are preserved in order and
/// never filtered.
pub fn summarize(groups: &IndexMap<String, Vec<f64>>) -> IndexMap<String, f64> {
    groups
        .iter()
        .map(|(zip, values)| (zip.clone(), values.iter().sum()))
        .collect()
}
