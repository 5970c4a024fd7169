use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color::MarkerPalette;
use crate::data::filter::Marker;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter plot of the current view.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let view = state.view();
    let palette = MarkerPalette::default();

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&view.title);
    });

    if view.points.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No companies match the current ranges.");
        });
        return;
    }

    let (x_span, y_span) = spans(state);
    let series = &view.points;
    let hover_series = series.clone();
    let tooltip_metrics = state.tooltip_metrics.clone();

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label(view.x_label.as_str())
        .y_axis_label(view.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |_name, value| {
            hover_series
                .nearest(value.x, value.y, x_span, y_span)
                .map(|p| p.tooltip(&tooltip_metrics))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            // Neutral first so the highlighted point draws on top.
            for (marker, name, radius) in [
                (Marker::Neutral, "companies", 3.5_f32),
                (Marker::Highlight, "highlighted", 5.0_f32),
            ] {
                let points: PlotPoints = series
                    .with_marker(marker)
                    .map(|p| [p.x, p.y])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(name)
                        .color(palette.color_for(marker))
                        .radius(radius)
                        .filled(true),
                );
            }
        });
}

/// Data spans of the selected axes, for nearest-point lookup.
fn spans(state: &AppState) -> (f64, f64) {
    let controls = state.controls();
    let span = |col| {
        let b = state.table.bounds(col);
        b.max - b.min
    };
    (span(controls.x_axis), span(controls.y_axis))
}
