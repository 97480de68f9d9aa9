use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::query::table::TableSpec;

// ---------------------------------------------------------------------------
// Metric table (lower half of the central panel)
// ---------------------------------------------------------------------------

/// Render the pivot table: the room column first, then one column per
/// neighborhood, each capped at the width its definition carries.
pub fn metric_table(ui: &mut Ui, spec: &TableSpec) {
    ui.heading(spec.metric.label());

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center));
        for col in &spec.columns {
            builder = builder.column(Column::initial(col.max_width).at_most(col.max_width));
        }

        builder
            .header(36.0, |mut header| {
                for col in &spec.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.field.as_str());
                    });
                }
            })
            .body(|mut body| {
                for row in &spec.rows {
                    body.row(18.0, |mut table_row| {
                        for col in &spec.columns {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(spec.cell_text(row, col));
                            });
                        }
                    });
                }
            });
    });
}
