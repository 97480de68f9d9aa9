use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::{FIRST_YEAR, LAST_YEAR};
use crate::query::metric::Metric;
use crate::state::AppState;

const BRAND: &str = "Belegung neuer Wohnungen in St. Gallen";

const INFORMATION: &str = "Der öffentlich verfügbare Datensatz \"Belegung neu erstellter \
Wohnungen\" enthält für die Jahre 2011-2019 Informationen zur Belegung mit Erwachsenen und \
Kindern. Auf Basis dieser Daten liefert die Auswertung eine \"Top-Down-Sicht\". Die Heatmap \
zeigt die Wohndichte [Definition: (Anzahl Erw. + 0.5 * Anz. Kinder) / Anzahl Zimmer]. Ein \
leeres Feld bedeutet, dass es keine Wohnung mit dieser Anzahl Zimmer für den Zeitraum gibt. \
Bei der Einstellung des Zeitraums steht zB 2014 für den 1.1.2014 um 0.00 Uhr.";

// ---------------------------------------------------------------------------
// Left side panel – information, year range, metric
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.heading("Information");
                ui.label(INFORMATION);
            });
            ui.add_space(8.0);

            year_range(ui, state);
            ui.add_space(8.0);

            metric_choice(ui, state);
        });
}

fn year_range(ui: &mut Ui, state: &mut AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.strong("Einstellung Zeitraum (für Grafik und Tabelle)");

        let mut low = state.selection.years.low;
        let mut high = state.selection.years.high;
        let low_changed = ui
            .add(Slider::new(&mut low, FIRST_YEAR..=LAST_YEAR).text("von"))
            .changed();
        let high_changed = ui
            .add(Slider::new(&mut high, FIRST_YEAR..=LAST_YEAR).text("bis"))
            .changed();

        // Dragging one end past the other pushes the other end along.
        if low_changed {
            state.set_year_range(low, high.max(low));
        } else if high_changed {
            state.set_year_range(low.min(high), high);
        }
    });
}

fn metric_choice(ui: &mut Ui, state: &mut AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.heading("Auswahl Messgrösse für Tabelle");
        let mut metric = state.selection.metric;
        for m in Metric::ALL {
            ui.radio_value(&mut metric, m, m.label());
        }
        state.set_metric(metric);
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export view…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new(BRAND).strong().size(16.0));
        ui.separator();

        ui.label(format!(
            "{} Wohnungs-Jahre geladen, {} im Zeitraum",
            state.dataset.len(),
            state.view.rows_in_range
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export view")
        .add_filter("JSON", &["json"])
        .set_file_name("wohnbelegung.json")
        .save_file();

    if let Some(path) = file {
        state.export_view(&path);
    }
}
