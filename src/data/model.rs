use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Field – the three semantic columns of a price list
// ---------------------------------------------------------------------------

/// A semantic column that every price list must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Product,
    Price,
    Weight,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Product, Field::Price, Field::Weight];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Product => write!(f, "product"),
            Field::Price => write!(f, "price"),
            Field::Weight => write!(f, "weight"),
        }
    }
}

// ---------------------------------------------------------------------------
// RowError – why a single CSV row did not become a record
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("row has no {0} column (index {1})")]
    MissingField(Field, usize),

    #[error("{field} '{value}' is not a number")]
    BadNumber { field: Field, value: String },

    #[error("{field} {value} is out of range")]
    OutOfRange { field: Field, value: f64 },
}

// ---------------------------------------------------------------------------
// PriceRecord – one product line of one price list
// ---------------------------------------------------------------------------

/// A single normalized product line. Immutable once built; `unit_price` is
/// derived in the constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    product_name: String,
    price: f64,
    weight: f64,
    source_file: String,
    unit_price: f64,
}

impl PriceRecord {
    /// Build a record, rejecting negative or non-finite prices and
    /// weights that are not strictly positive.
    pub fn new(
        product_name: &str,
        price: f64,
        weight: f64,
        source_file: impl Into<String>,
    ) -> Result<Self, RowError> {
        if !price.is_finite() || price < 0.0 {
            return Err(RowError::OutOfRange {
                field: Field::Price,
                value: price,
            });
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(RowError::OutOfRange {
                field: Field::Weight,
                value: weight,
            });
        }
        Ok(Self {
            product_name: product_name.trim().to_string(),
            price,
            weight,
            source_file: source_file.into(),
            unit_price: price / weight,
        })
    }

    /// Build a record from raw cell text, trimming before numeric parsing.
    pub fn parse(
        product_name: &str,
        price: &str,
        weight: &str,
        source_file: impl Into<String>,
    ) -> Result<Self, RowError> {
        let price = parse_number(Field::Price, price)?;
        let weight = parse_number(Field::Weight, weight)?;
        Self::new(product_name, price, weight, source_file)
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Price divided by weight; the ranking key for search results.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }
}

fn parse_number(field: Field, raw: &str) -> Result<f64, RowError> {
    raw.trim().parse::<f64>().map_err(|_| RowError::BadNumber {
        field,
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// PriceList – the complete loaded collection
// ---------------------------------------------------------------------------

/// A candidate file that contributed nothing, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// All records from one load pass, in file discovery order then line order.
#[derive(Debug, Clone, Default)]
pub struct PriceList {
    records: Vec<PriceRecord>,
    /// Names of files that contributed at least their header row.
    source_files: Vec<String>,
    skipped_files: Vec<SkippedFile>,
}

impl PriceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every record of one parsed file.
    pub fn extend_from_file(&mut self, file_name: &str, records: Vec<PriceRecord>) {
        self.source_files.push(file_name.to_string());
        self.records.extend(records);
    }

    /// Note a candidate file that was passed over.
    pub fn skip_file(&mut self, file_name: &str, reason: impl Into<String>) {
        self.skipped_files.push(SkippedFile {
            file_name: file_name.to_string(),
            reason: reason.into(),
        });
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceRecord> {
        self.records.iter()
    }

    pub fn source_files(&self) -> &[String] {
        &self.source_files
    }

    pub fn skipped_files(&self) -> &[SkippedFile] {
        &self.skipped_files
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a PriceList {
    type Item = &'a PriceRecord;
    type IntoIter = std::slice::Iter<'a, PriceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_price_is_price_over_weight() {
        let rec = PriceRecord::parse(" Milk ", "80", "2", "price_a.csv").unwrap();
        assert_eq!(rec.product_name(), "Milk");
        assert_eq!(rec.price(), 80.0);
        assert_eq!(rec.weight(), 2.0);
        assert_eq!(rec.unit_price(), 40.0);
        assert_eq!(rec.source_file(), "price_a.csv");
    }

    #[test]
    fn numbers_are_trimmed_before_parsing() {
        let rec = PriceRecord::parse("Rice", " 12.5 ", "\t0.5", "p.csv").unwrap();
        assert!((rec.unit_price() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_is_rejected() {
        let err = PriceRecord::parse("Salt", "10", "0", "p.csv").unwrap_err();
        assert_eq!(
            err,
            RowError::OutOfRange {
                field: Field::Weight,
                value: 0.0
            }
        );
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let err = PriceRecord::parse("Salt", "ten", "1", "p.csv").unwrap_err();
        assert!(matches!(
            err,
            RowError::BadNumber {
                field: Field::Price,
                ..
            }
        ));
    }

    #[test]
    fn negative_and_nan_prices_are_rejected() {
        assert!(PriceRecord::new("A", -1.0, 1.0, "p.csv").is_err());
        assert!(PriceRecord::new("A", f64::NAN, 1.0, "p.csv").is_err());
        assert!(PriceRecord::new("A", 0.0, 1.0, "p.csv").is_ok());
    }

    #[test]
    fn price_list_keeps_append_order() {
        let mut list = PriceList::new();
        list.extend_from_file(
            "a.csv",
            vec![PriceRecord::new("A", 1.0, 1.0, "a.csv").unwrap()],
        );
        list.extend_from_file(
            "b.csv",
            vec![PriceRecord::new("B", 2.0, 1.0, "b.csv").unwrap()],
        );
        let names: Vec<&str> = list.iter().map(|r| r.product_name()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(list.source_files(), ["a.csv", "b.csv"]);
        assert_eq!(list.len(), 2);
    }
}
