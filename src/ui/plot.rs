use eframe::egui::{self, Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::ColorScale;
use crate::query::heatmap::HeatmapSpec;

// ---------------------------------------------------------------------------
// Density heatmap (upper half of the central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap.  Cell `(x, y)` covers `[x-0.5, x+0.5] × [y-0.5, y+0.5]`;
/// category labels are drawn as plot text since both axes are categorical.
pub fn density_heatmap(ui: &mut Ui, spec: &HeatmapSpec, height: f32) {
    ui.heading(spec.title);

    if spec.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("Keine Daten im gewählten Zeitraum.");
            });
        });
        return;
    }
    let (low, high) = spec.color_domain().unwrap_or((spec.color_midpoint, spec.color_midpoint));
    let scale = ColorScale::new(low, high);
    let n_x = spec.x_categories.len() as f64;
    let n_y = spec.y_categories.len() as f64;
    let label_color = ui.visuals().text_color();

    Plot::new("density_heatmap")
        .height(height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_double_click_reset(false)
        .include_x(-1.3)
        .include_x(n_x - 0.5)
        .include_y(-1.2)
        .include_y(n_y - 0.5)
        .show(ui, |plot_ui| {
            for cell in &spec.cells {
                let (x, y) = (cell.x as f64, cell.y as f64);
                let square: PlotPoints = vec![
                    [x - 0.5, y - 0.5],
                    [x + 0.5, y - 0.5],
                    [x + 0.5, y + 0.5],
                    [x - 0.5, y + 0.5],
                ]
                .into();
                plot_ui.polygon(
                    Polygon::new(square)
                        .fill_color(scale.color_for(cell.value))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(&cell.label).color(scale.text_color_for(cell.value)),
                ));
            }

            for (i, hood) in spec.x_categories.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, -0.6),
                        RichText::new(hood).color(label_color),
                    )
                    .anchor(Align2::CENTER_TOP),
                );
            }
            for (i, rooms) in spec.y_categories.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(-0.6, i as f64),
                        RichText::new(rooms.label()).color(label_color),
                    )
                    .anchor(Align2::RIGHT_CENTER),
                );
            }
            if spec.show_y_title {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(-1.3, n_y - 0.5),
                        RichText::new(spec.y_label).color(label_color).small(),
                    )
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });
}
