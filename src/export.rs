//! Static HTML export of a record sequence.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::data::model::PriceRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no data available to export")]
    NoData,

    #[error("writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

const HEADER_CELLS: [&str; 6] = [
    "#",
    "Product",
    "Price",
    "Weight",
    "File",
    "Price per unit",
];

/// Write `records` as an HTML table to `path`, replacing any existing file.
///
/// Nothing is written when `records` is empty.
pub fn export_html(records: &[PriceRecord], path: &Path) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    std::fs::write(path, render_html(records)).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!("exported {} records to {}", records.len(), path.display());
    Ok(path.to_path_buf())
}

/// Render a complete UTF-8 HTML5 document with a single table.
pub fn render_html(records: &[PriceRecord]) -> String {
    let mut out = String::with_capacity(512 + records.len() * 160);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("  <meta charset=\"UTF-8\">\n");
    out.push_str("  <title>Product positions</title>\n");
    out.push_str("</head>\n<body>\n");
    out.push_str("  <table border=\"1\">\n    <tr>");
    for cell in HEADER_CELLS {
        let _ = write!(out, "<th>{cell}</th>");
    }
    out.push_str("</tr>\n");

    for (i, rec) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
            i + 1,
            escape(rec.product_name()),
            rec.price(),
            rec.weight(),
            escape(rec.source_file()),
            rec.unit_price(),
        );
    }

    out.push_str("  </table>\n</body>\n</html>\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
