use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::MarkerPalette;
use crate::data::filter::Marker;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Tabular listing of the filtered companies, in table order.
pub fn subset_table(ui: &mut Ui, state: &AppState) {
    let points = &state.view().points.points;
    let Some(first) = points.first() else {
        ui.label("No rows.");
        return;
    };
    let metric_names: Vec<&str> = first.metrics.iter().map(|(n, _)| n.as_str()).collect();
    let highlight = MarkerPalette::default().highlight;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(60.0), metric_names.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui| {
                ui.strong(state.table.name_column());
            });
            for name in &metric_names {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, points.len(), |mut row| {
                let point = &points[row.index()];
                row.col(|ui| {
                    let mut text = RichText::new(&point.label);
                    if point.marker == Marker::Highlight {
                        text = text.color(highlight).strong();
                    }
                    ui.label(text);
                });
                for (_, value) in &point.metrics {
                    row.col(|ui| {
                        ui.label(format!("{value}"));
                    });
                }
            });
        });
}
