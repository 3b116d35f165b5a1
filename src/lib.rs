//! Price list scanner.
//!
//! Loads every `*price*.csv` in a directory, maps each file's headers to
//! product/price/weight columns, and offers name search ranked by unit
//! price plus HTML export of the results.

pub mod app;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
