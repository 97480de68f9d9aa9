/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OccupancyDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ OccupancyDataset │  Vec<OccupancyRecord>, immutable
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  half-open year range → borrowed subset
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;

#[cfg(test)]
pub(crate) mod fixtures;
