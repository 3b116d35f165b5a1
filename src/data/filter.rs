use super::model::PriceRecord;

// ---------------------------------------------------------------------------
// Name search ranked by unit price
// ---------------------------------------------------------------------------

/// Return the records whose product name contains `query`, cheapest unit
/// price first.
///
/// * Matching is a case-insensitive substring test on the trimmed query.
/// * An empty or whitespace-only query matches every record.
/// * Records with equal unit prices keep their original relative order.
pub fn search(records: &[PriceRecord], query: &str) -> Vec<PriceRecord> {
    let needle = query.trim().to_lowercase();

    let mut hits: Vec<PriceRecord> = records
        .iter()
        .filter(|rec| rec.product_name().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    // `sort_by` is stable
    hits.sort_by(|a, b| a.unit_price().total_cmp(&b.unit_price()));
    hits
}
