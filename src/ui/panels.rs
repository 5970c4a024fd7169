use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::RangeConstraint;
use crate::data::model::MetricColumn;
use crate::state::{AppState, ControlEvent};

/// Where "Export view" writes.
const EXPORT_PATH: &str = "view.json";

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the control panel and apply whatever changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let mut events = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            selectors(ui, state, &mut events);
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                ui.strong("Ranges");
                if ui.small_button("Reset").clicked() {
                    events.push(ControlEvent::ResetRanges);
                }
            });
            range_sliders(ui, state, &mut events);
        });

    for event in events {
        state.apply(event);
    }
}

/// Highlight entity and x/y axis choosers.
fn selectors(ui: &mut Ui, state: &AppState, events: &mut Vec<ControlEvent>) {
    let table = &state.table;
    let controls = state.controls();

    ui.strong("Company");
    egui::ComboBox::from_id_salt("highlight")
        .selected_text(&controls.highlight)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in table.sorted_entity_names() {
                if ui
                    .selectable_label(controls.highlight == *name, name)
                    .clicked()
                {
                    events.push(ControlEvent::HighlightChanged(name.clone()));
                }
            }
        });

    let mut axis_combo = |ui: &mut Ui, label: &str, current: MetricColumn, make: fn(MetricColumn) -> ControlEvent| {
        ui.strong(label);
        egui::ComboBox::from_id_salt(label)
            .selected_text(table.metric_name(current))
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for &col in table.sorted_metrics() {
                    if ui
                        .selectable_label(col == current, table.metric_name(col))
                        .clicked()
                    {
                        events.push(make(col));
                    }
                }
            });
    };
    axis_combo(ui, "X Axis", controls.x_axis, ControlEvent::XAxisChanged);
    axis_combo(ui, "Y Axis", controls.y_axis, ControlEvent::YAxisChanged);
}

/// One min/max slider pair per metric column, in table order.
fn range_sliders(ui: &mut Ui, state: &AppState, events: &mut Vec<ControlEvent>) {
    let table = &state.table;

    for column in table.metrics() {
        let (lo, hi) = table.bounds(column).slider_range();
        let current = state
            .controls()
            .constraints
            .get(&column)
            .copied()
            .unwrap_or(RangeConstraint { min: lo, max: hi });
        let (mut min, mut max) = (current.min, current.max);

        ui.label(RichText::new(table.metric_name(column)).small());
        let changed_min = ui
            .add(egui::Slider::new(&mut min, lo..=hi).step_by(1.0).text("min"))
            .changed();
        let changed_max = ui
            .add(egui::Slider::new(&mut max, lo..=hi).step_by(1.0).text("max"))
            .changed();

        if changed_min || changed_max {
            events.push(ControlEvent::RangeChanged {
                column,
                range: RangeConstraint::new(min, max),
            });
        }
        ui.add_space(4.0);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the description, selection count and export action.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    if let Some(text) = &state.description {
        egui::CollapsingHeader::new("About")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.label(text.as_str());
            });
    }

    ui.horizontal(|ui: &mut Ui| {
        let view = state.view();
        ui.label(format!("{} of {} companies visible", view.selected, view.total));

        ui.separator();

        if ui.button("Export view").clicked() {
            state.export_view(Path::new(EXPORT_PATH));
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}
