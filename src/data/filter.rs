use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{MetricColumn, Table};

// ---------------------------------------------------------------------------
// Range constraints: half-open [min, max) per metric column
// ---------------------------------------------------------------------------

/// Bounds applied to one metric column. The upper bound is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConstraint {
    pub min: f64,
    pub max: f64,
}

impl RangeConstraint {
    /// Build a constraint, swapping the endpoints if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// `min <= value < max`.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value < self.max
    }
}

/// Per-column constraints: metric column → range.
/// A column absent from the map is unconstrained.
pub type Constraints = BTreeMap<MetricColumn, RangeConstraint>;

/// Initialise [`Constraints`] at each column's `[floor(min), ceil(max))`.
pub fn init_constraints(table: &Table) -> Constraints {
    table
        .metrics()
        .map(|col| {
            let (lo, hi) = table.bounds(col).slider_range();
            (col, RangeConstraint::new(lo, hi))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Selection result
// ---------------------------------------------------------------------------

/// How a surviving row is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Neutral,
    Highlight,
}

/// One row that passed every constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRow {
    /// Index into [`Table::rows`].
    pub row: usize,
    pub marker: Marker,
}

/// Rows passing the filters, in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subset {
    pub rows: Vec<SelectedRow>,
}

impl Subset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &SelectedRow> {
        self.rows.iter().filter(|r| r.marker == Marker::Highlight)
    }
}

/// Return the rows of `table` passing every constraint, tagging the row named
/// `highlight` (if it survives) with [`Marker::Highlight`].
pub fn select(table: &Table, constraints: &Constraints, highlight: &str) -> Subset {
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, entity)| {
            constraints
                .iter()
                .all(|(col, range)| range.contains(entity.value(*col)))
        })
        .map(|(row, entity)| SelectedRow {
            row,
            marker: if entity.name == highlight {
                Marker::Highlight
            } else {
                Marker::Neutral
            },
        })
        .collect();

    Subset { rows }
}
