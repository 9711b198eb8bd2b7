/// Data layer: core types, loading, search and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, check columns → DrugDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ DrugDataset │  Vec<DrugRecord>, immutable, shared via Arc
///   └─────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │  stats    │  histogram, top-N rankings
///   └──────────┘   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
