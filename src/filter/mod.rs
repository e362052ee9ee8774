use crate::model::ExamRecord;

/// Keep only the records whose display projection contains the search text,
/// case-insensitively. The text is matched verbatim, whitespace included.
/// An empty search returns the set unchanged and the order of survivors
/// always matches the input order.
pub fn filter_records(records: &[ExamRecord], search_text: &str) -> Vec<ExamRecord> {
    let needle = search_text.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    let mut filtered: Vec<ExamRecord> = Vec::new();
    for record in records.iter() {
        let matched = record
            .display_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if matched {
            filtered.push(record.clone());
        }
    }
    filtered
}
