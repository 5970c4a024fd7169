use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use flate2::read::GzDecoder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{DataLoadError, Entity, Table};

/// Default metric columns of the Drucker Institute rankings export.
pub const DRUCKER_METRICS: [&str; 7] = [
    "Ranking",
    "Customer Satisfaction",
    "Employee Engagement and Development",
    "Innovation",
    "Social Responsibility",
    "Financial Strength",
    "EFFECTIVENESS",
];

/// Which columns the input must carry.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header of the entity-name column; every other column is a metric.
    pub name_column: String,
    /// Metric headers that must be present.
    pub required_metrics: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            name_column: "Company".to_string(),
            required_metrics: DRUCKER_METRICS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rankings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`              – header row, one entity per line
/// * `.csv.gz` / `.gz`   – the same, gzip-compressed
/// * `.json`             – `[{ "Company": "...", "Ranking": 1, ... }, ...]`
/// * `.parquet` / `.pq`  – one Utf8 name column plus numeric columns
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Table, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "gz" => load_csv(GzDecoder::new(BufReader::new(open(path)?)), options),
        "csv" => load_csv(BufReader::new(open(path)?), options),
        "json" => load_json(path, options),
        "parquet" | "pq" => load_parquet(path, options),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Loaded {table} from {}", path.display());
    Ok(table)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Header resolution shared by every format
// ---------------------------------------------------------------------------

/// Resolved layout of the input columns.
struct Layout {
    name_idx: usize,
    /// (source column index, header) for each metric, in source order.
    metrics: Vec<(usize, String)>,
}

impl Layout {
    fn resolve(headers: &[String], options: &LoadOptions) -> Result<Self, DataLoadError> {
        let name_idx = headers
            .iter()
            .position(|h| *h == options.name_column)
            .ok_or_else(|| DataLoadError::MissingColumn(options.name_column.clone()))?;

        let metrics: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != name_idx)
            .map(|(i, h)| (i, h.clone()))
            .collect();

        for required in &options.required_metrics {
            if !metrics.iter().any(|(_, h)| h == required) {
                return Err(DataLoadError::MissingColumn(required.clone()));
            }
        }

        Ok(Layout { name_idx, metrics })
    }

    fn metric_names(&self) -> Vec<String> {
        self.metrics.iter().map(|(_, h)| h.clone()).collect()
    }
}

fn parse_metric(raw: &str, row: usize, column: &str) -> Result<f64, DataLoadError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataLoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn finite(v: f64, row: usize, column: &str) -> Result<f64, DataLoadError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DataLoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: v.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, the name column holds text,
/// every other column holds numbers.
fn load_csv<R: Read>(source: R, options: &LoadOptions) -> Result<Table, DataLoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataLoadError::Csv { row: 0, source })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let layout = Layout::resolve(&headers, options)?;
    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.map_err(|source| DataLoadError::Csv { row, source })?;

        let name = record.get(layout.name_idx).unwrap_or("").to_string();
        let values = layout
            .metrics
            .iter()
            .map(|(idx, header)| parse_metric(record.get(*idx).unwrap_or(""), row, header))
            .collect::<Result<Vec<f64>, _>>()?;

        rows.push(Entity { name, values });
    }

    Table::new(options.name_column.clone(), layout.metric_names(), rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Company": "Weyerhaeuser", "Ranking": 112, "Innovation": 61.2 },
///   ...
/// ]
/// ```
///
/// Columns are taken from the keys of the first record; later records must
/// carry them all.
fn load_json(path: &Path, options: &LoadOptions) -> Result<Table, DataLoadError> {
    let mut text = String::new();
    open(path)?
        .read_to_string(&mut text)
        .map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataLoadError::Json(e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Json("expected top-level array".to_string()))?;
    let first = records
        .first()
        .and_then(|r| r.as_object())
        .ok_or(DataLoadError::Empty("no rows"))?;

    let headers: Vec<String> = first.keys().cloned().collect();
    let layout = Layout::resolve(&headers, options)?;
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::Json(format!("row {row} is not an object")))?;

        let name = match obj.get(&options.name_column) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(DataLoadError::MissingColumn(options.name_column.clone())),
        };

        let values = layout
            .metrics
            .iter()
            .map(|(_, header)| match obj.get(header) {
                Some(JsonValue::Number(n)) => n
                    .as_f64()
                    .ok_or_else(|| DataLoadError::InvalidNumber {
                        row,
                        column: header.clone(),
                        value: n.to_string(),
                    }),
                Some(JsonValue::String(s)) => parse_metric(s, row, header),
                Some(other) => Err(DataLoadError::InvalidNumber {
                    row,
                    column: header.clone(),
                    value: other.to_string(),
                }),
                None => Err(DataLoadError::MissingColumn(header.clone())),
            })
            .collect::<Result<Vec<f64>, _>>()?;

        rows.push(Entity { name, values });
    }

    Table::new(options.name_column.clone(), layout.metric_names(), rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Expected schema:
/// - the name column: Utf8 or LargeUtf8
/// - every other column: Int32, Int64, Float32 or Float64
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<Table, DataLoadError> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataLoadError::Parquet(format!("reading metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataLoadError::Parquet(format!("building reader: {e}")))?;

    let mut layout: Option<Layout> = None;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| DataLoadError::Parquet(format!("reading batch: {e}")))?;
        let schema = batch.schema();

        if layout.is_none() {
            let headers: Vec<String> =
                schema.fields().iter().map(|f| f.name().clone()).collect();
            layout = Some(Layout::resolve(&headers, options)?);
        }
        let Some(layout) = layout.as_ref() else {
            continue;
        };

        let names = batch.column(layout.name_idx);
        for row in 0..batch.num_rows() {
            let row_no = rows.len() + 1;
            let name = extract_name(names, row)
                .ok_or_else(|| DataLoadError::Parquet(format!("row {row_no}: null or non-text name")))?;

            let values = layout
                .metrics
                .iter()
                .map(|(idx, header)| {
                    extract_f64(batch.column(*idx), row)
                        .ok_or_else(|| DataLoadError::InvalidNumber {
                            row: row_no,
                            column: header.clone(),
                            value: format!("{:?}", batch.column(*idx).data_type()),
                        })
                        .and_then(|v| finite(v, row_no, header))
                })
                .collect::<Result<Vec<f64>, _>>()?;

            rows.push(Entity { name, values });
        }
    }

    let layout = layout.ok_or(DataLoadError::Empty("no record batches"))?;
    Table::new(options.name_column.clone(), layout.metric_names(), rows)
}

// -- Parquet / Arrow helpers --

fn extract_name(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Extract a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    }
}
