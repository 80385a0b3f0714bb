//! The `MartStore` trait and supporting row types.
//!
//! The trait is implemented by storage backends (e.g.
//! `starling-store-sqlite`). The ETL pipeline depends on this abstraction,
//! not on any concrete backend.
//!
//! All operations are synchronous and blocking: the pipeline is a
//! single-threaded, single-writer batch process with strict phase ordering
//! (dimensions fully committed before any fact load).

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  grain::FactTable,
  record::{RepRecord, TxnRecord},
  star::{DateDimRow, Dimension, DimensionRow, FactRow, Quarter},
};

// ─── Row types ───────────────────────────────────────────────────────────────

/// One transaction joined back to its natural keys — the grain the
/// aggregator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxnFact {
  pub product: String,
  /// Country of the purchasing customer.
  pub region:  String,
  /// Rep display name (`"first last"`).
  pub rep:     String,
  pub date:    NaiveDate,
  pub amount:  i64,
}

/// Row counts reported after a normalized rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedCounts {
  pub transactions: usize,
  pub reps:         usize,
  pub territories:  usize,
  pub products:     usize,
  pub customers:    usize,
  pub countries:    usize,
}

/// One entry of the top-N report: a real dimension member and its
/// grand-total fact value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberTotal {
  pub key:        i64,
  pub name:       String,
  pub total_sold: i64,
}

/// One yearly roll-up value for a dimension member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTotal {
  pub year:       i32,
  pub total_sold: i64,
}

/// One point of the quarterly time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
  pub time_id:    String,
  pub year:       i32,
  pub quarter:    Quarter,
  pub total_sold: i64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational backend holding both the normalized
/// store and the star schema.
///
/// Lifecycle per run: `rebuild_normalized` (full replace from source
/// records), then `rebuild_star` followed by dimension inserts, then fact
/// appends. Nothing is merged or upserted; a mid-run failure requires a
/// full re-run.
pub trait MartStore {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Normalized store ──────────────────────────────────────────────────

  /// Drop and recreate the normalized tables, then load `reps` and `txns`
  /// with referential integrity. A transaction referencing an unknown rep
  /// id fails the rebuild.
  fn rebuild_normalized(
    &self,
    reps: &[RepRecord],
    txns: &[TxnRecord],
  ) -> Result<NormalizedCounts, Self::Error>;

  /// Every transaction joined back to product / region / rep natural
  /// names, in transaction-id order.
  fn transaction_facts(&self) -> Result<Vec<TxnFact>, Self::Error>;

  /// Distinct natural names for a name dimension, in a deterministic
  /// order.
  fn dimension_names(
    &self,
    dim: Dimension,
  ) -> Result<Vec<String>, Self::Error>;

  // ── Star schema ───────────────────────────────────────────────────────

  /// Drop and recreate every dimension and fact table.
  fn rebuild_star(&self) -> Result<(), Self::Error>;

  fn insert_dimension(
    &self,
    dim: Dimension,
    rows: &[DimensionRow],
  ) -> Result<(), Self::Error>;

  fn insert_date_dimension(
    &self,
    rows: &[DateDimRow],
  ) -> Result<(), Self::Error>;

  fn dimension_rows(
    &self,
    dim: Dimension,
  ) -> Result<Vec<DimensionRow>, Self::Error>;

  fn date_dimension_rows(&self) -> Result<Vec<DateDimRow>, Self::Error>;

  /// Append rows to a fact table. Facts are append-only within a run.
  fn append_facts(
    &self,
    table: FactTable,
    rows: &[FactRow],
  ) -> Result<(), Self::Error>;

  fn fact_rows(
    &self,
    table: FactTable,
  ) -> Result<Vec<FactRow>, Self::Error>;

  // ── Reporting reads ───────────────────────────────────────────────────

  /// The grand-total row of `table` (every key at the sentinel), if
  /// loaded.
  fn grand_total(
    &self,
    table: FactTable,
  ) -> Result<Option<i64>, Self::Error>;

  /// The `n` real primary-dimension members with the highest grand-total
  /// fact value, descending.
  fn top_members(
    &self,
    table: FactTable,
    n: usize,
  ) -> Result<Vec<MemberTotal>, Self::Error>;

  /// Per-year roll-up values for one primary-dimension member, ascending
  /// by year.
  fn yearly_breakdown(
    &self,
    table: FactTable,
    member: i64,
  ) -> Result<Vec<YearTotal>, Self::Error>;

  /// All real (year, quarter) rows with both name dimensions at ALL,
  /// ordered by time key.
  fn quarterly_series(
    &self,
    table: FactTable,
  ) -> Result<Vec<SeriesPoint>, Self::Error>;
}
