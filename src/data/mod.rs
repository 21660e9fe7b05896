/// Data layer: table types, loading, validation, analysis and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sniff format → TableDecoder → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  require `name` + `score` → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  stats, high scorers, pass/fail, sort, chart input
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  sorted table → CSV bytes
///   └──────────┘
/// ```

pub mod analysis;
pub mod export;
pub mod loader;
pub mod model;
pub mod schema;
pub mod stats;
