use std::fs::File;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use flate2::{write::GzEncoder, Compression};
use parquet::arrow::ArrowWriter;

const COMPANIES: usize = 250;
const CSV_PATH: &str = "data/drucker_rankings_2017.csv.gz";
const PARQUET_PATH: &str = "data/drucker_rankings_2017.parquet";

const SCORE_COLUMNS: [&str; 5] = [
    "Customer Satisfaction",
    "Employee Engagement and Development",
    "Innovation",
    "Social Responsibility",
    "Financial Strength",
];

const SEED_NAMES: [&str; 12] = [
    "Weyerhaeuser", "Apple", "Boeing", "Caterpillar", "Deere", "eBay",
    "FedEx", "General Mills", "Hershey", "IBM", "Johnson & Johnson", "Kellogg",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Company {
    name: String,
    scores: [f64; 5],
    effectiveness: f64,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn generate(rng: &mut SimpleRng) -> Vec<(i64, Company)> {
    let mut companies: Vec<Company> = (0..COMPANIES)
        .map(|i| {
            let name = SEED_NAMES
                .get(i)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Company {i:03}"));
            let scores: [f64; 5] =
                std::array::from_fn(|_| round1(rng.gauss(50.0, 10.0).clamp(0.0, 100.0)));
            let effectiveness = round1(scores.iter().sum::<f64>() / scores.len() as f64);
            Company {
                name,
                scores,
                effectiveness,
            }
        })
        .collect();

    companies.sort_by(|a, b| b.effectiveness.total_cmp(&a.effectiveness));
    companies
        .into_iter()
        .enumerate()
        .map(|(i, c)| (i as i64 + 1, c))
        .collect()
}

fn write_csv(rows: &[(i64, Company)]) -> Result<()> {
    let file = File::create(CSV_PATH).with_context(|| format!("creating {CSV_PATH}"))?;
    let mut writer = csv::Writer::from_writer(GzEncoder::new(file, Compression::default()));

    let mut header = vec!["Company", "Ranking"];
    header.extend(SCORE_COLUMNS);
    header.push("EFFECTIVENESS");
    writer.write_record(&header)?;

    for (rank, c) in rows {
        let mut record = vec![c.name.clone(), rank.to_string()];
        record.extend(c.scores.iter().map(|s| s.to_string()));
        record.push(c.effectiveness.to_string());
        writer.write_record(&record)?;
    }

    let encoder = writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV writer: {}", e.error()))?;
    encoder.finish().context("finishing gzip stream")?;
    Ok(())
}

fn write_parquet(rows: &[(i64, Company)]) -> Result<()> {
    let mut fields = vec![
        Field::new("Company", DataType::Utf8, false),
        Field::new("Ranking", DataType::Int64, false),
    ];
    fields.extend(SCORE_COLUMNS.iter().map(|c| Field::new(*c, DataType::Float64, false)));
    fields.push(Field::new("EFFECTIVENESS", DataType::Float64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|(_, c)| c.name.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|(r, _)| *r).collect::<Vec<_>>())),
    ];
    for i in 0..SCORE_COLUMNS.len() {
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|(_, c)| c.scores[i]).collect::<Vec<_>>(),
        )));
    }
    columns.push(Arc::new(Float64Array::from(
        rows.iter().map(|(_, c)| c.effectiveness).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = File::create(PARQUET_PATH).with_context(|| format!("creating {PARQUET_PATH}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(2017);
    let rows = generate(&mut rng);

    std::fs::create_dir_all("data").context("creating data directory")?;
    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {} companies to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}
