//! Run orchestration: the strict phase ordering of a full rebuild.

use serde::Serialize;
use starling_core::{
  grain::FactTable,
  record::{RepRecord, TxnRecord},
  star::Dimension,
  store::{MartStore, NormalizedCounts},
};
use tracing::info;

use crate::{
  Error, Result,
  aggregate::{self, PreparedTxn},
  dimension,
  fact::{self, DimensionLookup},
};

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Machine-readable result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub normalized:        NormalizedCounts,
  pub dimension_rows:    DimensionRowCounts,
  pub product_fact_rows: usize,
  pub rep_fact_rows:     usize,
  pub grand_total:       i64,
}

/// Per-dimension row counts, sentinels included.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DimensionRowCounts {
  pub product: usize,
  pub region:  usize,
  pub rep:     usize,
  pub date:    usize,
}

// ─── Run ─────────────────────────────────────────────────────────────────────

/// Run the full ETL: rebuild the normalized store from the source
/// records, rebuild the star schema, and load all sixteen views.
///
/// Dimensions are fully committed before any fact load. The rebuild is
/// not transactional across phases: a mid-run failure leaves the star
/// schema partially populated, and recovery is a full re-run.
pub fn run<S: MartStore>(
  store: &S,
  reps: &[RepRecord],
  txns: &[TxnRecord],
) -> Result<RunSummary> {
  info!(
    reps = reps.len(),
    transactions = txns.len(),
    "rebuilding normalized store"
  );
  let normalized =
    store.rebuild_normalized(reps, txns).map_err(Error::store)?;

  let prepared = aggregate::prepare(
    store.transaction_facts().map_err(Error::store)?,
  )?;

  info!("rebuilding star schema");
  store.rebuild_star().map_err(Error::store)?;

  let dimension_rows = DimensionRowCounts {
    product: dimension::build_name_dimension(store, Dimension::Product)?,
    region:  dimension::build_name_dimension(store, Dimension::Region)?,
    rep:     dimension::build_name_dimension(store, Dimension::Rep)?,
    date:    dimension::build_date_dimension(store, &prepared)?,
  };

  let product_fact_rows =
    load_fact_table(store, FactTable::Product, &prepared)?;
  let rep_fact_rows = load_fact_table(store, FactTable::Rep, &prepared)?;

  let grand_total = check_consistency(store, &prepared)?;

  info!(product_fact_rows, rep_fact_rows, grand_total, "run complete");

  Ok(RunSummary {
    normalized,
    dimension_rows,
    product_fact_rows,
    rep_fact_rows,
    grand_total,
  })
}

/// Aggregate and load the eight views of one fact table.
fn load_fact_table<S: MartStore>(
  store: &S,
  table: FactTable,
  prepared: &[PreparedTxn],
) -> Result<usize> {
  let primary = DimensionLookup::from_store(store, table.primary())?;
  let secondary = DimensionLookup::from_store(store, table.secondary())?;

  let mut loaded = 0;
  for spec in table.grains() {
    let groups = aggregate::aggregate(prepared, table, spec);
    let rows =
      fact::load_view(store, table, spec, &groups, &primary, &secondary)?;
    info!(table = table.name(), view = spec.name, rows, "view loaded");
    loaded += rows;
  }
  Ok(loaded)
}

/// Cross-table check: both grand-total rows must equal the sum of amount
/// over all transactions.
fn check_consistency<S: MartStore>(
  store: &S,
  prepared: &[PreparedTxn],
) -> Result<i64> {
  let source: i64 = prepared.iter().map(|t| t.amount).sum();
  let product = store
    .grand_total(FactTable::Product)
    .map_err(Error::store)?
    .unwrap_or(0);
  let rep = store
    .grand_total(FactTable::Rep)
    .map_err(Error::store)?
    .unwrap_or(0);

  if product != source || rep != source {
    return Err(Error::ConsistencyCheck { product, rep, source_total: source });
  }
  Ok(source)
}
