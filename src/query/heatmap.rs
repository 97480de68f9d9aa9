use serde::Serialize;

use crate::data::model::{OccupancyRecord, RoomBucket};

use super::metric::{Aggregation, Measure, ValueFormat};
use super::pivot::group_by_cell;

pub const HEATMAP_TITLE: &str = "Wohndichte nach Quartier und Anzahl Zimmer";
pub const ROOMS_AXIS_LABEL: &str = "Anzahl Zimmer";
/// Density placed at the centre of the colour scale.
pub const DENSITY_MIDPOINT: f64 = 0.9;
pub const COLOR_SCALE: &str = "YlGnBu";

const LABEL_FORMAT: ValueFormat = ValueFormat::Fixed { decimals: 2 };

/// One drawable cell: mean density of a (neighborhood, room bucket) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub neighborhood: String,
    pub rooms: RoomBucket,
    /// Index into [`HeatmapSpec::x_categories`].
    pub x: usize,
    /// Index into [`HeatmapSpec::y_categories`].
    pub y: usize,
    pub value: f64,
    pub label: String,
}

/// Declarative description of the density heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSpec {
    pub title: &'static str,
    /// Neighborhoods present in the filtered subset, ascending.
    pub x_categories: Vec<String>,
    pub y_categories: Vec<RoomBucket>,
    /// Name of the row category.  Only drawn as an axis title when
    /// `show_y_title` is set; the dashboard shows the bucket labels alone.
    pub y_label: &'static str,
    pub show_y_title: bool,
    pub cells: Vec<HeatmapCell>,
    pub color_scale: &'static str,
    pub color_midpoint: f64,
    pub show_scale: bool,
}

impl HeatmapSpec {
    pub fn build(subset: &[&OccupancyRecord]) -> Self {
        let groups = group_by_cell(subset);

        let mut x_categories: Vec<String> = Vec::new();
        let mut cells = Vec::with_capacity(groups.len());
        // Keys arrive sorted by neighborhood, so each new name is pushed once.
        for ((hood, rooms), rows) in &groups {
            if x_categories.last().map(String::as_str) != Some(*hood) {
                x_categories.push(hood.to_string());
            }
            let Some(value) = Aggregation::Mean(Measure::Density).apply(rows) else {
                continue;
            };
            cells.push(HeatmapCell {
                neighborhood: hood.to_string(),
                rooms: *rooms,
                x: x_categories.len() - 1,
                y: rooms.index(),
                value,
                label: LABEL_FORMAT.format(Some(value)),
            });
        }

        HeatmapSpec {
            title: HEATMAP_TITLE,
            x_categories,
            y_categories: RoomBucket::ALL.to_vec(),
            y_label: ROOMS_AXIS_LABEL,
            show_y_title: false,
            cells,
            color_scale: COLOR_SCALE,
            color_midpoint: DENSITY_MIDPOINT,
            show_scale: false,
        }
    }

    #[cfg(test)]
    pub fn cell(&self, neighborhood: &str, rooms: RoomBucket) -> Option<&HeatmapCell> {
        self.cells
            .iter()
            .find(|c| c.neighborhood == neighborhood && c.rooms == rooms)
    }

    /// Colour domain centred on the midpoint: `[m - d, m + d]` where `d` is
    /// the largest distance of any cell value from `m`.
    pub fn color_domain(&self) -> Option<(f64, f64)> {
        let spread = self
            .cells
            .iter()
            .map(|c| (c.value - self.color_midpoint).abs())
            .reduce(f64::max)?;
        Some((self.color_midpoint - spread, self.color_midpoint + spread))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_by_years, YearRange};
    use crate::data::fixtures::{city, two_units};

    #[test]
    fn test_mean_density_full_range() {
        let ds = two_units();
        let subset = filter_by_years(&ds.records, YearRange::new(2011, 2020));
        let spec = HeatmapSpec::build(&subset);
        let cell = spec.cell("A", RoomBucket::Two).unwrap();
        assert!((cell.value - 0.9).abs() < 1e-12);
        assert_eq!(cell.label, "0.90");
        assert_eq!((cell.x, cell.y), (0, 1));
        assert_eq!(spec.cells.len(), 1);
    }

    #[test]
    fn test_mean_density_narrow_range() {
        let ds = two_units();
        let subset = filter_by_years(&ds.records, YearRange::new(2011, 2013));
        let spec = HeatmapSpec::build(&subset);
        let cell = spec.cell("A", RoomBucket::Two).unwrap();
        assert!((cell.value - 0.8).abs() < 1e-12);
        assert_eq!(cell.label, "0.80");
    }

    #[test]
    fn test_empty_range_has_nothing_to_draw() {
        let ds = two_units();
        let subset = filter_by_years(&ds.records, YearRange::new(2016, 2020));
        let spec = HeatmapSpec::build(&subset);
        assert!(spec.is_empty());
        assert!(spec.x_categories.is_empty());
        assert!(spec.cell("A", RoomBucket::Two).is_none());
        assert_eq!(spec.color_domain(), None);
        assert_eq!(spec.y_categories, RoomBucket::ALL);
    }

    #[test]
    fn test_axes_and_indices() {
        let ds = city();
        let subset = filter_by_years(&ds.records, YearRange::default());
        let spec = HeatmapSpec::build(&subset);
        assert_eq!(spec.x_categories, ["Centrum", "Ost", "West"]);
        for cell in &spec.cells {
            assert_eq!(spec.x_categories[cell.x], cell.neighborhood);
            assert_eq!(spec.y_categories[cell.y], cell.rooms);
        }
        assert!(spec.cell("West", RoomBucket::One).is_none());
        assert!(!spec.show_scale);
    }

    #[test]
    fn test_no_axis_title_is_drawn() {
        let ds = city();
        let subset = filter_by_years(&ds.records, YearRange::default());
        let spec = HeatmapSpec::build(&subset);
        assert!(!spec.show_y_title);
        assert_eq!(spec.y_label, ROOMS_AXIS_LABEL);

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["show_y_title"], false);
        assert_eq!(json["y_label"], "Anzahl Zimmer");
    }

    #[test]
    fn test_color_domain_is_centred_on_midpoint() {
        let ds = city();
        let subset = filter_by_years(&ds.records, YearRange::default());
        let spec = HeatmapSpec::build(&subset);
        // Cell means range from 0.4 (West, 6+) to 1.2 (Ost, 3).
        let (lo, hi) = spec.color_domain().unwrap();
        assert!((lo - 0.4).abs() < 1e-12);
        assert!((hi - 1.4).abs() < 1e-12);
    }
}
