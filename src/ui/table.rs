use std::fmt::Write as _;

use crate::data::model::PriceRecord;

// ---------------------------------------------------------------------------
// Console result table
// ---------------------------------------------------------------------------

pub const NAME_WIDTH: usize = 20;
pub const FILE_WIDTH: usize = 15;

/// Cut `text` to at most `max` characters (not bytes).
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Render search results as a fixed-width text table.
pub fn render_table(records: &[PriceRecord]) -> String {
    let mut out = String::new();

    let header = format!(
        "{:>4} {:<name_w$} {:>9} {:>7} {:<file_w$} {:>12}",
        "#",
        "Product",
        "Price",
        "Weight",
        "File",
        "Unit price",
        name_w = NAME_WIDTH,
        file_w = FILE_WIDTH,
    );
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.chars().count()));

    for (i, rec) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<name_w$} {:>9} {:>7} {:<file_w$} {:>12.2}",
            i + 1,
            truncate(rec.product_name(), NAME_WIDTH),
            rec.price(),
            rec.weight(),
            truncate(rec.source_file(), FILE_WIDTH),
            rec.unit_price(),
            name_w = NAME_WIDTH,
            file_w = FILE_WIDTH,
        );
    }
    out
}
