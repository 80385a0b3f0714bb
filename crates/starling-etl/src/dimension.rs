//! The dimension builder.
//!
//! Name dimensions are a distinct-names projection: contiguous surrogate
//! keys 1..N in insertion order, with the ALL sentinel row (key 0)
//! inserted after the real members so real keys are stable regardless of
//! sentinel placement. The date dimension is derived, not projected: the
//! observed (year, quarter) pairs, one yearly roll-up row per observed
//! year, and the single grand-total row.

use std::collections::BTreeSet;

use starling_core::{
  star::{DateDimRow, Dimension, DimensionRow, Quarter},
  store::MartStore,
};
use tracing::debug;

use crate::{Error, Result, aggregate::PreparedTxn};

/// Build and insert one name dimension from the distinct names in the
/// normalized store. Returns the row count, sentinel included.
pub fn build_name_dimension<S: MartStore>(
  store: &S,
  dim: Dimension,
) -> Result<usize> {
  let names = store.dimension_names(dim).map_err(Error::store)?;

  let mut rows: Vec<DimensionRow> = names
    .into_iter()
    .zip(1..)
    .map(|(name, key)| DimensionRow { key, name })
    .collect();
  rows.push(DimensionRow::all());

  store.insert_dimension(dim, &rows).map_err(Error::store)?;
  debug!(dimension = dim.name(), rows = rows.len(), "dimension built");
  Ok(rows.len())
}

/// Build and insert the date dimension's roll-up lattice. Returns the
/// row count.
pub fn build_date_dimension<S: MartStore>(
  store: &S,
  txns: &[PreparedTxn],
) -> Result<usize> {
  let rows = date_lattice(txns);
  store.insert_date_dimension(&rows).map_err(Error::store)?;
  debug!(rows = rows.len(), "date dimension built");
  Ok(rows.len())
}

/// The three-level lattice: detail rows for every observed period, one
/// yearly row per observed year, one grand-total row.
fn date_lattice(txns: &[PreparedTxn]) -> Vec<DateDimRow> {
  let periods: BTreeSet<(i32, Quarter)> =
    txns.iter().map(|t| (t.year, t.quarter)).collect();
  let years: BTreeSet<i32> = periods.iter().map(|&(y, _)| y).collect();

  let mut rows: Vec<DateDimRow> = periods
    .iter()
    .map(|&(year, quarter)| DateDimRow::detail(year, quarter))
    .collect();
  rows.extend(years.iter().map(|&y| DateDimRow::yearly(y)));
  rows.push(DateDimRow::grand());
  rows
}

// ─── Tests ───────────────────────────────────────────────────────────────────
