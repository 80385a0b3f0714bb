//! The reporting read contracts.
//!
//! Both reads are constant-shape lookups over the pre-aggregated facts,
//! filtered by sentinel-vs-real keys; neither runs a GROUP BY — the load
//! phase already did all grouping.

use serde::Serialize;
use starling_core::{
  grain::FactTable,
  store::{MartStore, SeriesPoint, YearTotal},
};

use crate::{Error, Result};

/// One top-N entry: a dimension member's grand total plus its per-year
/// breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct TopMember {
  pub name:       String,
  pub total_sold: i64,
  pub by_year:    Vec<YearTotal>,
}

/// The `n` members of `table`'s primary dimension with the highest
/// grand-total value, descending, each with its yearly breakdown.
pub fn top_members<S: MartStore>(
  store: &S,
  table: FactTable,
  n: usize,
) -> Result<Vec<TopMember>> {
  let members = store.top_members(table, n).map_err(Error::store)?;
  members
    .into_iter()
    .map(|m| {
      let by_year =
        store.yearly_breakdown(table, m.key).map_err(Error::store)?;
      Ok(TopMember { name: m.name, total_sold: m.total_sold, by_year })
    })
    .collect()
}

/// The quarterly time series of `table`, with both name dimensions at
/// ALL, ordered by time key.
pub fn quarterly_series<S: MartStore>(
  store: &S,
  table: FactTable,
) -> Result<Vec<SeriesPoint>> {
  store.quarterly_series(table).map_err(Error::store)
}
