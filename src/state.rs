use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use crate::data::filter::search;
use crate::data::headers::HeaderSynonyms;
use crate::data::loader::load_directory;
use crate::data::model::{PriceList, PriceRecord};
use crate::export::{export_html, ExportError};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything the shell works on, held for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded price lists (empty until `load`).
    prices: PriceList,

    /// Result of the most recent search; `None` until the first search.
    last_results: Option<Vec<PriceRecord>>,
}

impl Session {
    /// Start a session from an already built collection.
    pub fn new(prices: PriceList) -> Self {
        Self {
            prices,
            last_results: None,
        }
    }

    /// Scan `dir` and replace the whole collection.
    pub fn load(&mut self, dir: &Path, synonyms: &HeaderSynonyms) -> Result<()> {
        self.prices = load_directory(dir, synonyms)?;
        self.last_results = None;
        Ok(())
    }

    pub fn prices(&self) -> &PriceList {
        &self.prices
    }

    pub fn has_data(&self) -> bool {
        !self.prices.is_empty()
    }

    pub fn last_results(&self) -> Option<&[PriceRecord]> {
        self.last_results.as_deref()
    }

    /// Run a name search and remember its result for a later export.
    pub fn search(&mut self, query: &str) -> &[PriceRecord] {
        if !self.has_data() {
            debug!("search for '{}' with no price lists loaded", query.trim());
        }
        let hits = search(self.prices.records(), query);
        self.last_results.insert(hits).as_slice()
    }

    /// Records an export would write: the last search result, or the full
    /// collection if nothing has been searched yet.
    pub fn export_target(&self) -> &[PriceRecord] {
        match &self.last_results {
            Some(hits) => hits.as_slice(),
            None => self.prices.records(),
        }
    }

    pub fn export(&self, path: &Path) -> Result<PathBuf, ExportError> {
        export_html(self.export_target(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut list = PriceList::new();
        list.extend_from_file(
            "price_a.csv",
            vec![
                PriceRecord::new("Milk", 80.0, 2.0, "price_a.csv").unwrap(),
                PriceRecord::new("Kefir", 30.0, 1.0, "price_a.csv").unwrap(),
            ],
        );
        Session::new(list)
    }

    #[test]
    fn export_target_defaults_to_everything() {
        let s = session();
        assert!(s.last_results().is_none());
        assert_eq!(s.export_target().len(), 2);
    }

    #[test]
    fn search_result_becomes_export_target() {
        let mut s = session();
        assert_eq!(s.search("milk").len(), 1);
        assert_eq!(s.export_target()[0].product_name(), "Milk");

        // a later empty result replaces the previous one
        assert!(s.search("bread").is_empty());
        assert!(s.export_target().is_empty());
    }

    #[test]
    fn search_without_data_is_empty() {
        let mut s = Session::default();
        assert!(!s.has_data());
        assert!(s.search("").is_empty());
        assert_eq!(s.last_results(), Some(&[][..]));
    }

    #[test]
    fn reload_replaces_collection_and_forgets_results() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("price.csv"), "name,price,weight\nTea,10,1\n").unwrap();

        let mut s = session();
        s.search("milk");
        s.load(tmp.path(), &HeaderSynonyms::default()).unwrap();
        assert_eq!(s.prices().len(), 1);
        assert!(s.last_results().is_none());
    }

    #[test]
    fn exporting_empty_search_result_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.html");
        let mut s = session();
        s.search("nothing matches");
        assert!(matches!(s.export(&path), Err(ExportError::NoData)));
        assert!(!path.exists());
    }
}
