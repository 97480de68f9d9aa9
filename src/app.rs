use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WohnbelegungApp {
    pub state: AppState,
}

impl WohnbelegungApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WohnbelegungApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: range and metric ----
        egui::SidePanel::left("selection_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: heatmap above, table below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let heatmap_height = (ui.available_height() * 0.55).max(240.0);
            plot::density_heatmap(ui, &self.state.view.heatmap, heatmap_height);
            ui.separator();
            table::metric_table(ui, &self.state.view.table);
        });
    }
}
