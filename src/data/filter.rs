use super::model::{DrugDataset, DrugRecord};

// ---------------------------------------------------------------------------
// Free-text search
// ---------------------------------------------------------------------------

/// Return indices of records whose drug name or medical condition contains
/// `query`, ignoring case. Source order is preserved.
///
/// * An empty query selects every record (no search performed).
/// * A record with a missing field never matches on that field.
pub fn search_indices(dataset: &DrugDataset, query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..dataset.len()).collect();
    }
    let needle = query.to_lowercase();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_query(record, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Records matching `query`, see [`search_indices`].
pub fn search<'a>(dataset: &'a DrugDataset, query: &str) -> Vec<&'a DrugRecord> {
    search_indices(dataset, query)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}

/// `needle` must already be lowercase.
fn matches_query(record: &DrugRecord, needle: &str) -> bool {
    [&record.drug_name, &record.medical_condition]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
