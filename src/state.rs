use std::path::Path;

use crate::data::filter::YearRange;
use crate::data::model::OccupancyDataset;
use crate::query::metric::Metric;
use crate::query::view::{render, DashboardView, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, fixed for the process lifetime.
    pub dataset: OccupancyDataset,

    /// Current year range and metric.
    pub selection: Selection,

    /// Heatmap and table for `selection` (cached).
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: OccupancyDataset, selection: Selection) -> Self {
        let view = render(&dataset, selection);
        Self {
            dataset,
            selection,
            view,
            status_message: None,
        }
    }

    /// Recompute `view` after a selection change.
    pub fn refresh(&mut self) {
        self.view = render(&self.dataset, self.selection);
    }

    /// Apply new range bounds as the controls allow them.
    pub fn set_year_range(&mut self, low: i32, high: i32) {
        let years = YearRange::clamped(low, high);
        if years != self.selection.years {
            self.selection.years = years;
            self.refresh();
        }
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if metric != self.selection.metric {
            self.selection.metric = metric;
            self.refresh();
        }
    }

    /// Write the current view to `path`, reporting the outcome in the status line.
    pub fn export_view(&mut self, path: &Path) {
        match self.view.write_json(path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                self.status_message = Some(format!("Exportiert: {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
