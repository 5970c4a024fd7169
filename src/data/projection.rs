use serde::Serialize;

use super::filter::{Marker, Subset};
use super::model::{MetricColumn, Table};

/// One drawable point of the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub marker: Marker,
    /// (metric name, value) for every metric column, in table order.
    pub metrics: Vec<(String, f64)>,
}

impl Point {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|(m, _)| m == name)
            .map(|(_, v)| *v)
    }

    /// Hover text: the label followed by the requested metrics that exist.
    pub fn tooltip(&self, metric_names: &[String]) -> String {
        let mut text = self.label.clone();
        for name in metric_names {
            if let Some(v) = self.metric(name) {
                text.push_str(&format!("\n{name}: {v}"));
            }
        }
        text
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointSeries {
    pub points: Vec<Point>,
}

impl PointSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points drawn with the given marker, keeping series order.
    pub fn with_marker(&self, marker: Marker) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(move |p| p.marker == marker)
    }

    /// Point closest to `(x, y)` after scaling each axis by its span, so
    /// columns with very different ranges weigh equally.
    pub fn nearest(&self, x: f64, y: f64, x_span: f64, y_span: f64) -> Option<&Point> {
        let sx = if x_span > 0.0 { x_span } else { 1.0 };
        let sy = if y_span > 0.0 { y_span } else { 1.0 };
        self.points.iter().min_by(|a, b| {
            let da = ((a.x - x) / sx).powi(2) + ((a.y - y) / sy).powi(2);
            let db = ((b.x - x) / sx).powi(2) + ((b.y - y) / sy).powi(2);
            da.total_cmp(&db)
        })
    }
}

/// Project the selected rows onto the `(x_col, y_col)` plane, in subset order.
pub fn project(table: &Table, subset: &Subset, x_col: MetricColumn, y_col: MetricColumn) -> PointSeries {
    let points = subset
        .rows
        .iter()
        .map(|sel| {
            let entity = table.row(sel.row);
            Point {
                x: entity.value(x_col),
                y: entity.value(y_col),
                label: entity.name.clone(),
                marker: sel.marker,
                metrics: table
                    .metrics()
                    .map(|c| (table.metric_name(c).to_string(), entity.value(c)))
                    .collect(),
            }
        })
        .collect();

    PointSeries { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{init_constraints, select, Constraints, RangeConstraint};
    use crate::data::model::tests::sample_table;
    use proptest::prelude::*;

    #[test]
    fn points_follow_selected_axes() {
        let table = sample_table();
        let x = table.metric("Innovation").unwrap();
        let y = table.metric("Ranking").unwrap();
        let subset = select(&table, &Constraints::new(), "apple");

        let series = project(&table, &subset, x, y);
        assert_eq!(series.len(), 4);
        let apple = &series.points[1];
        assert_eq!((apple.x, apple.y), (90.1, 1.0));
        assert_eq!(apple.label, "apple");
        assert_eq!(apple.marker, Marker::Highlight);
        assert_eq!(series.with_marker(Marker::Neutral).count(), 3);
    }

    #[test]
    fn snapshot_carries_every_metric() {
        let table = sample_table();
        let ranking = table.metric("Ranking").unwrap();
        let subset = select(&table, &Constraints::new(), "");
        let series = project(&table, &subset, ranking, ranking);

        let names: Vec<&str> = series.points[0].metrics.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Ranking", "Innovation", "EFFECTIVENESS"]);
        assert_eq!(series.points[0].metric("EFFECTIVENESS"), Some(70.2));
    }

    #[test]
    fn tooltip_lists_requested_metrics() {
        let table = sample_table();
        let ranking = table.metric("Ranking").unwrap();
        let subset = select(&table, &Constraints::new(), "");
        let series = project(&table, &subset, ranking, ranking);

        let text = series.points[2].tooltip(&["Ranking".into(), "Revenue".into()]);
        assert_eq!(text, "Boeing\nRanking: 2");
    }

    #[test]
    fn empty_subset_projects_to_empty_series() {
        let table = sample_table();
        let ranking = table.metric("Ranking").unwrap();
        let constraints = Constraints::from([(ranking, RangeConstraint::new(0.0, 0.5))]);
        let subset = select(&table, &constraints, "");

        assert!(project(&table, &subset, ranking, ranking).is_empty());
    }

    #[test]
    fn nearest_scales_axes_by_span() {
        let table = sample_table();
        let x = table.metric("Ranking").unwrap();
        let y = table.metric("Innovation").unwrap();
        let subset = select(&table, &init_constraints(&table), "");
        let series = project(&table, &subset, x, y);

        let hit = series.nearest(2.1, 59.0, 3.0, 50.0).unwrap();
        assert_eq!(hit.label, "Boeing");
    }

    proptest! {
        #[test]
        fn projection_preserves_length_and_order(lo in 0.0f64..5.0, hi in 0.0f64..5.0) {
            let table = sample_table();
            let ranking = table.metric("Ranking").unwrap();
            let innovation = table.metric("Innovation").unwrap();
            let constraints = Constraints::from([(ranking, RangeConstraint::new(lo, hi))]);

            let subset = select(&table, &constraints, "Boeing");
            let series = project(&table, &subset, ranking, innovation);

            prop_assert_eq!(series.len(), subset.len());
            for (point, sel) in series.points.iter().zip(&subset.rows) {
                prop_assert_eq!(&point.label, &table.row(sel.row).name);
                prop_assert_eq!(point.marker, sel.marker);
            }
        }
    }
}
