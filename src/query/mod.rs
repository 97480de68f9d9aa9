/// Query / presentation layer.
///
/// ```text
///   OccupancyDataset + Selection
///        │  filter_by_years
///        ▼
///   filtered subset (&OccupancyRecord)
///        │  group_by_cell
///        ├──────────────────────┐
///        ▼                      ▼
///   PivotTable (Metric)     HeatmapSpec (mean Dichte)
///        │
///        ▼
///   TableSpec
/// ```

pub mod heatmap;
pub mod metric;
pub mod pivot;
pub mod table;
pub mod view;
