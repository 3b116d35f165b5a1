use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use thiserror::Error;

use super::headers::{HeaderSynonyms, ResolvedColumns};
use super::model::{Field, PriceList, PriceRecord, RowError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a whole candidate file was skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parsing header row of {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{file} is missing required columns: {}", join_fields(.missing))]
    MissingColumns { file: String, missing: Vec<Field> },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Records parsed from one file plus the number of rows that were dropped.
#[derive(Debug, Clone)]
pub struct FileLoad {
    pub file_name: String,
    pub records: Vec<PriceRecord>,
    pub skipped_rows: usize,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Whether a directory entry name looks like a price list.
///
/// `price` is matched case-insensitively anywhere in the name; the `.csv`
/// suffix is matched case-sensitively, so `PRICE.CSV` is not a candidate.
pub fn is_candidate_name(name: &str) -> bool {
    name.to_lowercase().contains("price") && name.ends_with(".csv")
}

/// List candidate files directly inside `dir`, sorted by file name.
pub fn discover_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_candidate_name(name) {
            continue;
        }
        // follows symlinks
        if !entry.path().is_file() {
            debug!("ignoring non-file candidate {name}");
            continue;
        }
        debug!("found price list {name}");
        candidates.push(entry.path());
    }
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load every candidate price list in `dir`.
///
/// Only directory-level failures are returned; a file that cannot be used
/// is skipped and noted in [`PriceList::skipped_files`].
pub fn load_directory(dir: &Path, synonyms: &HeaderSynonyms) -> Result<PriceList> {
    let mut list = PriceList::new();

    for path in discover_candidates(dir)? {
        match load_file(&path, synonyms) {
            Ok(load) => {
                if load.skipped_rows > 0 {
                    debug!(
                        "{}: skipped {} malformed rows",
                        load.file_name, load.skipped_rows
                    );
                }
                list.extend_from_file(&load.file_name, load.records);
            }
            Err(e) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                info!("skipping {file_name}: {e}");
                list.skip_file(&file_name, e.to_string());
            }
        }
    }

    info!(
        "loaded {} records from {} price lists",
        list.len(),
        list.source_files().len()
    );
    Ok(list)
}

/// Parse a single price list.
///
/// The file is read fully as UTF-8 before parsing. Line 1 is the header
/// row. Rows whose fields are missing or fail numeric parsing are dropped.
pub fn load_file(path: &Path, synonyms: &HeaderSynonyms) -> Result<FileLoad, LoadError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_price_list(&text, &file_name, synonyms)
}

/// Parse price list text that has already been read into memory.
///
/// Each line goes through its own CSV reader, so a stray quote can only
/// spoil the line it appears on.
pub fn parse_price_list(
    text: &str,
    file_name: &str,
    synonyms: &HeaderSynonyms,
) -> Result<FileLoad, LoadError> {
    let mut lines = text.lines();

    let headers = match lines.next() {
        Some(line) => parse_line(line).map_err(|source| LoadError::Csv {
            path: file_name.to_string(),
            source,
        })?,
        None => StringRecord::new(),
    };
    let header_cells: Vec<&str> = headers.iter().collect();

    let columns = synonyms
        .resolve(&header_cells)
        .complete()
        .map_err(|missing| LoadError::MissingColumns {
            file: file_name.to_string(),
            missing,
        })?;

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (row_no, line) in lines.enumerate() {
        let outcome = parse_line(line)
            .map_err(|e| e.to_string())
            .and_then(|row| row_to_record(&row, columns, file_name).map_err(|e| e.to_string()));
        match outcome {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                // +2: one for the header line, one for 1-based numbering
                debug!("{file_name}: line {}: {reason}", row_no + 2);
                skipped_rows += 1;
            }
        }
    }

    Ok(FileLoad {
        file_name: file_name.to_string(),
        records,
        skipped_rows,
    })
}

/// Split one line into fields. An empty line yields an empty record.
fn parse_line(line: &str) -> Result<StringRecord, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

fn row_to_record(
    row: &StringRecord,
    columns: ResolvedColumns,
    file_name: &str,
) -> Result<PriceRecord, RowError> {
    let cell = |field: Field, idx: usize| row.get(idx).ok_or(RowError::MissingField(field, idx));

    let product = cell(Field::Product, columns.product)?;
    let price = cell(Field::Price, columns.price)?;
    let weight = cell(Field::Weight, columns.weight)?;

    PriceRecord::parse(product, price, weight, file_name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn parse(text: &str) -> Result<FileLoad, LoadError> {
        parse_price_list(text, "price_test.csv", &HeaderSynonyms::default())
    }

    #[test]
    fn candidate_name_rules() {
        assert!(is_candidate_name("price_1.csv"));
        assert!(is_candidate_name("Big_PRICE_list.csv"));
        assert!(!is_candidate_name("price_1.CSV"));
        assert!(!is_candidate_name("prices.txt"));
        assert!(!is_candidate_name("catalog.csv"));
    }

    #[test]
    fn parses_rows_and_derives_unit_price() {
        let load = parse("name,price,weight\nMilk,80,2\nBread,45,0.5\n").unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped_rows, 0);
        let milk = &load.records[0];
        assert_eq!(milk.product_name(), "Milk");
        assert_eq!(milk.unit_price(), 40.0);
        assert_eq!(milk.source_file(), "price_test.csv");
        assert_eq!(load.records[1].unit_price(), 90.0);
    }

    #[test]
    fn column_order_follows_headers() {
        let load = parse("фасовка,номер,розница,наименование\n3,1,90,Сыр\n").unwrap();
        let rec = &load.records[0];
        assert_eq!(rec.product_name(), "Сыр");
        assert_eq!(rec.price(), 90.0);
        assert_eq!(rec.weight(), 3.0);
    }

    #[test]
    fn bad_rows_are_skipped_individually() {
        let text = "товар,цена,вес\n\
                    Apple,10,1\n\
                    Pear,abc,1\n\
                    Plum,5\n\
                    Fig,12,0\n\
                    Kiwi,8,2\n";
        let load = parse(text).unwrap();
        let names: Vec<&str> = load.records.iter().map(|r| r.product_name()).collect();
        assert_eq!(names, ["Apple", "Kiwi"]);
        assert_eq!(load.skipped_rows, 3);
    }

    #[test]
    fn missing_columns_reject_the_file() {
        let err = parse("name,cost,weight\nMilk,80,2\n").unwrap_err();
        match err {
            LoadError::MissingColumns { missing, .. } => assert_eq!(missing, vec![Field::Price]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_has_no_columns() {
        assert!(matches!(parse(""), Err(LoadError::MissingColumns { .. })));
    }

    #[test]
    fn quoted_comma_stays_in_one_field() {
        let load = parse("name,price,weight\n\"Tea, green\",300,0.25\n").unwrap();
        assert_eq!(load.records[0].product_name(), "Tea, green");
        assert_eq!(load.records[0].unit_price(), 1200.0);
    }

    #[test]
    fn stray_quote_spoils_only_its_own_row() {
        let text = "name,price,weight\n\
                    \"Extra milk,80,2\n\
                    Bread,45,0.5\n\
                    Tea,300,0.25\n\
                    Kefir,75,1\n";
        let load = parse(text).unwrap();
        let names: Vec<&str> = load.records.iter().map(|r| r.product_name()).collect();
        assert_eq!(names, ["Bread", "Tea", "Kefir"]);
        assert_eq!(load.skipped_rows, 1);
    }

    #[test]
    fn blank_lines_count_as_skipped_rows() {
        let load = parse("name,price,weight\nMilk,80,2\n\nBread,45,0.5\n").unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped_rows, 1);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let load = parse("name,price,weight\r\nMilk,80,2\r\n").unwrap();
        assert_eq!(load.records.len(), 1);
    }

    #[test]
    fn directory_load_skips_bad_files_and_keeps_order() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("price_b.csv"), "name,price,weight\nB1,10,1\nB2,x,1\n").unwrap();
        fs::write(dir.join("price_a.csv"), "товар,цена,вес\nA1,4,2\n").unwrap();
        fs::write(dir.join("price_c.csv"), "name,weight\nC1,1\n").unwrap();
        fs::write(dir.join("price_d.CSV"), "name,price,weight\nD1,1,1\n").unwrap();
        fs::write(dir.join("stock.csv"), "name,price,weight\nS1,1,1\n").unwrap();
        fs::write(dir.join("price_e.csv"), [0xffu8, 0xfe, 0x00]).unwrap();

        let list = load_directory(dir, &HeaderSynonyms::default()).unwrap();
        let names: Vec<&str> = list.iter().map(|r| r.product_name()).collect();
        assert_eq!(names, ["A1", "B1"]);
        assert_eq!(list.source_files(), ["price_a.csv", "price_b.csv"]);

        let skipped: Vec<&str> = list
            .skipped_files()
            .iter()
            .map(|s| s.file_name.as_str())
            .collect();
        assert_eq!(skipped, ["price_c.csv", "price_e.csv"]);
        assert!(list.skipped_files()[0].reason.contains("price"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_price_list_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir(&data).unwrap();
        let target = data.join("list.csv");
        fs::write(&target, "name,price,weight\nMilk,80,2\n").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("price_link.csv")).unwrap();

        let list = load_directory(tmp.path(), &HeaderSynonyms::default()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.records()[0].source_file(), "price_link.csv");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(load_directory(&missing, &HeaderSynonyms::default()).is_err());
    }

    #[test]
    fn subdirectory_named_like_a_price_list_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("price_dir.csv")).unwrap();
        assert!(discover_candidates(tmp.path()).unwrap().is_empty());
    }
}
