use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DataLoadError – everything that can go wrong before the first render
// ---------------------------------------------------------------------------

/// Failure to build a [`Table`] from an input file.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(String),

    #[error("malformed Parquet: {0}")]
    Parquet(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing expected column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("duplicate entity name '{0}'")]
    DuplicateEntity(String),

    #[error("dataset is empty: {0}")]
    Empty(&'static str),

    #[error("unknown metric column '{0}'")]
    UnknownMetric(String),
}

// ---------------------------------------------------------------------------
// MetricColumn – validated handle to one numeric column
// ---------------------------------------------------------------------------

/// Position of a metric column inside the [`Table`] that produced it.
///
/// Only obtainable through [`Table::metric`] / [`Table::metrics`], so every
/// handle indexes a column that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricColumn(usize);

/// Observed `[min, max]` of a metric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBounds {
    pub min: f64,
    pub max: f64,
}

impl ColumnBounds {
    /// Whole-number bounds used to seed range controls.
    pub fn slider_range(&self) -> (f64, f64) {
        (self.min.floor(), self.max.ceil())
    }
}

// ---------------------------------------------------------------------------
// Entity – one company row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    /// One value per metric column, in [`Table::metrics`] order.
    pub values: Vec<f64>,
}

impl Entity {
    pub fn value(&self, column: MetricColumn) -> f64 {
        self.values[column.0]
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset, immutable after construction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Table {
    name_column: String,
    metric_names: Vec<String>,
    rows: Vec<Entity>,
    bounds: Vec<ColumnBounds>,
    sorted_metrics: Vec<MetricColumn>,
    sorted_entities: Vec<String>,
}

impl Table {
    /// Build the table and its static indices.
    ///
    /// Rows must carry exactly one value per metric, in `metric_names` order.
    pub fn new(
        name_column: impl Into<String>,
        metric_names: Vec<String>,
        rows: Vec<Entity>,
    ) -> Result<Self, DataLoadError> {
        if metric_names.is_empty() {
            return Err(DataLoadError::Empty("no metric columns"));
        }
        if rows.is_empty() {
            return Err(DataLoadError::Empty("no rows"));
        }

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.name.as_str()) {
                return Err(DataLoadError::DuplicateEntity(row.name.clone()));
            }
            debug_assert_eq!(row.values.len(), metric_names.len());
        }

        let bounds = (0..metric_names.len())
            .map(|col| {
                rows.iter().fold(
                    ColumnBounds {
                        min: f64::INFINITY,
                        max: f64::NEG_INFINITY,
                    },
                    |acc, row| ColumnBounds {
                        min: acc.min.min(row.values[col]),
                        max: acc.max.max(row.values[col]),
                    },
                )
            })
            .collect();

        let mut sorted_metrics: Vec<MetricColumn> =
            (0..metric_names.len()).map(MetricColumn).collect();
        sorted_metrics.sort_by(|a, b| metric_names[a.0].cmp(&metric_names[b.0]));

        let mut sorted_entities: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();
        sorted_entities.sort_by_key(|name| name.to_lowercase());

        Ok(Table {
            name_column: name_column.into(),
            metric_names,
            rows,
            bounds,
            sorted_metrics,
            sorted_entities,
        })
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true for a table built by [`Table::new`].
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header of the entity-name column.
    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Entity] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Entity {
        &self.rows[index]
    }

    pub fn value(&self, row: usize, column: MetricColumn) -> f64 {
        self.rows[row].value(column)
    }

    /// Resolve a metric column by its header.
    pub fn metric(&self, name: &str) -> Option<MetricColumn> {
        self.metric_names
            .iter()
            .position(|m| m == name)
            .map(MetricColumn)
    }

    pub fn metric_name(&self, column: MetricColumn) -> &str {
        &self.metric_names[column.0]
    }

    /// Metric columns in file order.
    pub fn metrics(&self) -> impl ExactSizeIterator<Item = MetricColumn> + '_ {
        (0..self.metric_names.len()).map(MetricColumn)
    }

    /// Metric columns ordered by name, for axis selectors.
    pub fn sorted_metrics(&self) -> &[MetricColumn] {
        &self.sorted_metrics
    }

    pub fn sorted_metric_names(&self) -> Vec<&str> {
        self.sorted_metrics
            .iter()
            .map(|&c| self.metric_name(c))
            .collect()
    }

    /// Entity names ordered case-insensitively.
    pub fn sorted_entity_names(&self) -> &[String] {
        &self.sorted_entities
    }

    pub fn bounds(&self, column: MetricColumn) -> ColumnBounds {
        self.bounds[column.0]
    }

    pub fn find_entity(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.name == name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows × {} metrics [{}]",
            self.rows.len(),
            self.metric_names.len(),
            self.metric_names.join(", ")
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small fixture shared by the filter / projection / state tests.
    pub(crate) fn sample_table() -> Table {
        let metrics = vec![
            "Ranking".to_string(),
            "Innovation".to_string(),
            "EFFECTIVENESS".to_string(),
        ];
        let rows = vec![
            entity("Weyerhaeuser", &[3.0, 55.5, 70.2]),
            entity("apple", &[1.0, 90.1, 80.4]),
            entity("Boeing", &[2.0, 60.0, 75.9]),
            entity("Zoetis", &[4.0, 40.3, 50.5]),
        ];
        Table::new("Company", metrics, rows).unwrap()
    }

    pub(crate) fn entity(name: &str, values: &[f64]) -> Entity {
        Entity {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn entity_names_sort_case_insensitively() {
        let table = sample_table();
        assert_eq!(
            table.sorted_entity_names(),
            &["apple", "Boeing", "Weyerhaeuser", "Zoetis"]
        );
    }

    #[test]
    fn metric_names_sort_lexically() {
        let table = sample_table();
        assert_eq!(
            table.sorted_metric_names(),
            vec!["EFFECTIVENESS", "Innovation", "Ranking"]
        );
    }

    #[test]
    fn bounds_cover_observed_values() {
        let table = sample_table();
        let innovation = table.metric("Innovation").unwrap();
        assert_eq!(
            table.bounds(innovation),
            ColumnBounds {
                min: 40.3,
                max: 90.1
            }
        );
        assert_eq!(table.bounds(innovation).slider_range(), (40.0, 91.0));
    }

    #[test]
    fn unknown_metric_has_no_handle() {
        assert!(sample_table().metric("Revenue").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Table::new(
            "Company",
            vec!["Ranking".into()],
            vec![entity("A", &[1.0]), entity("A", &[2.0])],
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateEntity(name) if name == "A"));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            Table::new("Company", vec!["Ranking".into()], vec![]),
            Err(DataLoadError::Empty(_))
        ));
        assert!(matches!(
            Table::new("Company", vec![], vec![entity("A", &[])]),
            Err(DataLoadError::Empty(_))
        ));
    }
}
