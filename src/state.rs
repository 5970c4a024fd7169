use std::sync::Arc;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::{init_constraints, select, Constraints, RangeConstraint};
use crate::data::model::{DataLoadError, MetricColumn, Table};
use crate::data::projection::{project, PointSeries};

// ---------------------------------------------------------------------------
// Control snapshot: the complete input of one render
// ---------------------------------------------------------------------------

/// Current value of every control. Replaced wholesale on each event.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSnapshot {
    pub constraints: Constraints,
    pub highlight: String,
    pub x_axis: MetricColumn,
    pub y_axis: MetricColumn,
}

impl ControlSnapshot {
    /// Startup values: every range spans its column, the given selections.
    pub fn initial(
        table: &Table,
        highlight: &str,
        x_axis: MetricColumn,
        y_axis: MetricColumn,
    ) -> Self {
        Self {
            constraints: init_constraints(table),
            highlight: highlight.to_string(),
            x_axis,
            y_axis,
        }
    }

    /// Snapshot that results from applying `event`.
    pub fn with(&self, table: &Table, event: &ControlEvent) -> Self {
        let mut next = self.clone();
        match event {
            ControlEvent::RangeChanged { column, range } => {
                next.constraints
                    .insert(*column, RangeConstraint::new(range.min, range.max));
            }
            ControlEvent::HighlightChanged(name) => next.highlight = name.clone(),
            ControlEvent::XAxisChanged(col) => next.x_axis = *col,
            ControlEvent::YAxisChanged(col) => next.y_axis = *col,
            ControlEvent::ResetRanges => next.constraints = init_constraints(table),
        }
        next
    }
}

/// A value change forwarded by the control surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    RangeChanged {
        column: MetricColumn,
        range: RangeConstraint,
    },
    HighlightChanged(String),
    XAxisChanged(MetricColumn),
    YAxisChanged(MetricColumn),
    ResetRanges,
}

// ---------------------------------------------------------------------------
// Rendered state
// ---------------------------------------------------------------------------

/// Everything the rendering surface needs for one frame of the plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderState {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub selected: usize,
    pub total: usize,
    pub points: PointSeries,
}

impl RenderState {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Filter, project and label: the pure core of every refresh.
pub fn render(table: &Table, controls: &ControlSnapshot) -> RenderState {
    let subset = select(table, &controls.constraints, &controls.highlight);
    let points = project(table, &subset, controls.x_axis, controls.y_axis);
    RenderState {
        title: format!("{} companies selected", subset.len()),
        x_label: table.metric_name(controls.x_axis).to_string(),
        y_label: table.metric_name(controls.y_axis).to_string(),
        selected: subset.len(),
        total: table.len(),
        points,
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, read-only after startup.
    pub table: Arc<Table>,

    /// Current control values.
    controls: ControlSnapshot,

    /// Output of the last refresh.
    view: RenderState,

    /// Metrics listed in hover text.
    pub tooltip_metrics: Vec<String>,

    /// Static description text, if one was found.
    pub description: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Resolve the configured defaults against `table` and run the first refresh.
    pub fn new(table: Arc<Table>, config: &DashboardConfig) -> Result<Self, DataLoadError> {
        let axis = |name: &str| {
            table
                .metric(name)
                .ok_or_else(|| DataLoadError::UnknownMetric(name.to_string()))
        };
        let x_axis = axis(&config.default_x_axis)?;
        let y_axis = axis(&config.default_y_axis)?;

        if table.find_entity(&config.default_highlight).is_none() {
            log::warn!(
                "Default highlight '{}' is not in the dataset",
                config.default_highlight
            );
        }

        let controls = ControlSnapshot::initial(&table, &config.default_highlight, x_axis, y_axis);
        let view = render(&table, &controls);
        log::debug!("Initial render: {}", view.title);

        Ok(Self {
            table,
            controls,
            view,
            tooltip_metrics: config.tooltip_metrics.clone(),
            description: None,
            status_message: None,
        })
    }

    pub fn controls(&self) -> &ControlSnapshot {
        &self.controls
    }

    pub fn view(&self) -> &RenderState {
        &self.view
    }

    /// Apply one control change and re-render.
    pub fn apply(&mut self, event: ControlEvent) {
        let next = self.controls.with(&self.table, &event);
        if next == self.controls {
            return;
        }
        self.controls = next;
        self.view = render(&self.table, &self.controls);
        log::debug!("{event:?} → {}", self.view.title);
    }

    /// Write the current view as JSON.
    pub fn export_view(&mut self, path: &std::path::Path) {
        let result = self
            .view
            .to_json()
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(path, json).map_err(anyhow::Error::from));
        match result {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Marker;
    use crate::data::model::tests::sample_table;

    fn config() -> DashboardConfig {
        DashboardConfig {
            default_highlight: "Weyerhaeuser".to_string(),
            default_x_axis: "Ranking".to_string(),
            default_y_axis: "Innovation".to_string(),
            ..DashboardConfig::default()
        }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(sample_table()), &config()).unwrap()
    }

    #[test]
    fn startup_render_matches_independent_select() {
        let state = state();
        let table = &state.table;
        let expected = select(table, &init_constraints(table), "Weyerhaeuser");

        let view = state.view();
        assert!(!view.title.is_empty());
        assert_eq!(view.points.len(), expected.len());
        assert_eq!(view.title, "3 companies selected");
        assert_eq!((view.x_label.as_str(), view.y_label.as_str()), ("Ranking", "Innovation"));
        assert_eq!(view.points.with_marker(Marker::Highlight).count(), 1);
    }

    #[test]
    fn unknown_default_axis_fails_construction() {
        let config = DashboardConfig {
            default_y_axis: "Revenue".to_string(),
            ..config()
        };
        let err = AppState::new(Arc::new(sample_table()), &config).err().unwrap();
        assert!(matches!(err, DataLoadError::UnknownMetric(m) if m == "Revenue"));
    }

    #[test]
    fn range_event_refilters_and_retitles() {
        let mut state = state();
        let ranking = state.table.metric("Ranking").unwrap();
        state.apply(ControlEvent::RangeChanged {
            column: ranking,
            range: RangeConstraint::new(1.0, 3.0),
        });

        let labels: Vec<&str> = state.view().points.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["apple", "Boeing"]);
        assert_eq!(state.view().title, "2 companies selected");
        assert_eq!(state.view().points.with_marker(Marker::Highlight).count(), 0);
    }

    #[test]
    fn axis_events_update_labels_and_coordinates() {
        let mut state = state();
        let eff = state.table.metric("EFFECTIVENESS").unwrap();
        state.apply(ControlEvent::XAxisChanged(eff));
        state.apply(ControlEvent::YAxisChanged(eff));

        let view = state.view();
        assert_eq!(view.x_label, "EFFECTIVENESS");
        assert_eq!(view.y_label, "EFFECTIVENESS");
        assert_eq!(view.points.points[0].x, 70.2);
        assert_eq!(view.points.points[0].y, 70.2);
    }

    #[test]
    fn highlight_event_moves_marker() {
        let mut state = state();
        state.apply(ControlEvent::HighlightChanged("Boeing".to_string()));

        let marked: Vec<&str> = state
            .view()
            .points
            .with_marker(Marker::Highlight)
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(marked, vec!["Boeing"]);
        assert_eq!(state.controls().highlight, "Boeing");
    }

    #[test]
    fn reset_restores_initial_ranges() {
        let mut state = state();
        let initial = state.controls().constraints.clone();
        let ranking = state.table.metric("Ranking").unwrap();
        state.apply(ControlEvent::RangeChanged {
            column: ranking,
            range: RangeConstraint::new(2.0, 2.5),
        });
        assert_eq!(state.view().selected, 1);

        state.apply(ControlEvent::ResetRanges);
        assert_eq!(state.controls().constraints, initial);
        assert_eq!(state.view().selected, 3);
    }

    #[test]
    fn view_serialises_for_export() {
        let json = state().view().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "3 companies selected");
        assert_eq!(value["points"]["points"][0]["marker"], "highlight");
        assert_eq!(value["total"], 4);
    }
}
