/// Data layer: core types, loading, filtering and projection.
///
/// Architecture:
/// ```text
///  .csv.gz / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Entity>, column bounds, sorted names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  half-open range constraints + highlight → Subset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection │  Subset × (x, y) → PointSeries
///   └────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
