use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{filter_by_years, YearRange};
use crate::data::model::OccupancyDataset;

use super::heatmap::HeatmapSpec;
use super::metric::Metric;
use super::pivot::PivotTable;
use super::table::TableSpec;

/// The user's current choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub years: YearRange,
    pub metric: Metric,
}

/// Everything the dashboard shows for one [`Selection`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    /// Rows of the filtered subset.
    pub rows_in_range: usize,
    pub heatmap: HeatmapSpec,
    pub table: TableSpec,
}

/// Recompute both views from the immutable dataset.
pub fn render(dataset: &OccupancyDataset, selection: Selection) -> DashboardView {
    let subset = filter_by_years(&dataset.records, selection.years);
    log::debug!(
        "Rendering {} for [{}, {}): {} rows",
        selection.metric,
        selection.years.low,
        selection.years.high,
        subset.len()
    );

    let pivot = PivotTable::build(&subset, selection.metric.aggregation());
    DashboardView {
        selection,
        rows_in_range: subset.len(),
        heatmap: HeatmapSpec::build(&subset),
        table: TableSpec::from_pivot(&pivot, selection.metric),
    }
}

impl DashboardView {
    /// Write the view as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing view")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::two_units;
    use crate::data::model::RoomBucket;
    use crate::query::table::Cell;

    fn select(low: i32, high: i32, metric: Metric) -> Selection {
        Selection {
            years: YearRange::new(low, high),
            metric,
        }
    }

    #[test]
    fn test_defaults() {
        let sel = Selection::default();
        assert_eq!(sel.years, YearRange::new(2011, 2020));
        assert_eq!(sel.metric, Metric::Dwellings);
    }

    #[test]
    fn test_full_range_scenario() {
        let view = render(&two_units(), select(2011, 2020, Metric::Dwellings));
        assert_eq!(view.rows_in_range, 2);
        assert_eq!(view.table.rows[1].get("A"), &Cell::Number(2.0));
        let cell = view.heatmap.cell("A", RoomBucket::Two).unwrap();
        assert!((cell.value - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_narrow_range_scenario() {
        let view = render(&two_units(), select(2011, 2013, Metric::Dwellings));
        assert_eq!(view.table.rows[1].get("A"), &Cell::Number(1.0));
        let cell = view.heatmap.cell("A", RoomBucket::Two).unwrap();
        assert!((cell.value - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_empty_range_scenario() {
        for metric in Metric::ALL {
            let view = render(&two_units(), select(2016, 2020, metric));
            assert_eq!(view.rows_in_range, 0);
            assert_eq!(view.table.rows.len(), 6);
            assert_eq!(view.table.columns.len(), 1);
            assert!(view.table.rows.iter().all(|r| r.get("A") == &Cell::Null));
            assert!(view.heatmap.cell("A", RoomBucket::Two).is_none());
        }
    }

    #[test]
    fn test_write_json() {
        let view = render(&two_units(), Selection::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        view.write_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["selection"]["metric"], "Anzahl Wohnungen");
        assert_eq!(json["selection"]["years"]["low"], 2011);
        assert_eq!(json["heatmap"]["color_midpoint"], 0.9);
        assert_eq!(json["heatmap"]["cells"][0]["label"], "0.90");
        assert_eq!(json["heatmap"]["y_categories"][5], "6+");
    }
}
