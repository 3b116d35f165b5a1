use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::model::Field;

// ---------------------------------------------------------------------------
// Synonym sets: header spelling → semantic field
// ---------------------------------------------------------------------------

const PRODUCT_SYNONYMS: &[&str] = &[
    "товар",
    "название",
    "наименование",
    "продукт",
    "item",
    "name",
    "title",
    "product",
];
const PRICE_SYNONYMS: &[&str] = &["цена", "розница", "price", "retail"];
const WEIGHT_SYNONYMS: &[&str] = &["вес", "масса", "фасовка", "weight", "mass", "packaging"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading synonyms file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("parsing synonyms file {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Recognized header spellings for each field. All entries are stored
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSynonyms {
    pub product: BTreeSet<String>,
    pub price: BTreeSet<String>,
    pub weight: BTreeSet<String>,
}

impl Default for HeaderSynonyms {
    fn default() -> Self {
        Self {
            product: lowercase_set(PRODUCT_SYNONYMS.iter().copied()),
            price: lowercase_set(PRICE_SYNONYMS.iter().copied()),
            weight: lowercase_set(WEIGHT_SYNONYMS.iter().copied()),
        }
    }
}

/// On-disk override: `{"product": [...], "price": [...], "weight": [...]}`.
/// Omitted fields fall back to the built-in lists.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SynonymsFile {
    #[serde(default)]
    product: Option<Vec<String>>,
    #[serde(default)]
    price: Option<Vec<String>>,
    #[serde(default)]
    weight: Option<Vec<String>>,
}

impl HeaderSynonyms {
    /// Parse an override from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: SynonymsFile = serde_json::from_str(text)?;
        let mut synonyms = Self::default();
        if let Some(list) = file.product {
            synonyms.product = lowercase_set(list.iter().map(String::as_str));
        }
        if let Some(list) = file.price {
            synonyms.price = lowercase_set(list.iter().map(String::as_str));
        }
        if let Some(list) = file.weight {
            synonyms.weight = lowercase_set(list.iter().map(String::as_str));
        }
        Ok(synonyms)
    }

    /// Load an override from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn for_field(&self, field: Field) -> &BTreeSet<String> {
        match field {
            Field::Product => &self.product,
            Field::Price => &self.price,
            Field::Weight => &self.weight,
        }
    }

    /// Map a header row to column indices. Each field takes the first
    /// header (left to right) whose lowercase text is an exact synonym.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> ColumnIndices {
        let lowered: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.as_ref();
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.to_lowercase()
            })
            .collect();

        let find = |field: Field| {
            let set = self.for_field(field);
            lowered.iter().position(|h| set.contains(h))
        };

        ColumnIndices {
            product: find(Field::Product),
            price: find(Field::Price),
            weight: find(Field::Weight),
        }
    }
}

fn lowercase_set<'a>(items: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    items.map(str::to_lowercase).collect()
}

// ---------------------------------------------------------------------------
// ColumnIndices – result of resolving one header row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnIndices {
    pub product: Option<usize>,
    pub price: Option<usize>,
    pub weight: Option<usize>,
}

/// Fully resolved indices, only obtainable when every field matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub product: usize,
    pub price: usize,
    pub weight: usize,
}

impl ColumnIndices {
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Product => self.product,
            Field::Price => self.price,
            Field::Weight => self.weight,
        }
    }

    /// Fields that no header matched.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    pub fn complete(&self) -> Result<ResolvedColumns, Vec<Field>> {
        match (self.product, self.price, self.weight) {
            (Some(product), Some(price), Some(weight)) => Ok(ResolvedColumns {
                product,
                price,
                weight,
            }),
            _ => Err(self.missing()),
        }
    }
}
