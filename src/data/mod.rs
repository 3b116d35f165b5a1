/// Data layer: core types, header resolution, loading, and search.
///
/// Architecture:
/// ```text
///  dir/*price*.csv
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  loader   │ ──▶ │ headers   │  header row → column indices
///   └──────────┘     └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ PriceList  │  Vec<PriceRecord>, unit price derived at load
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  name substring → records sorted by unit price
///   └──────────┘
/// ```

pub mod filter;
pub mod headers;
pub mod loader;
pub mod model;
