//! The fact loader.
//!
//! Resolves the natural-key columns of an aggregated view to surrogate
//! keys through one generic resolver, composes the time key per the
//! date-dimension rule, and appends the rows to the target fact table.
//! A name with no dimension row fails the view's load; rows are never
//! silently dropped.

use std::collections::HashMap;

use starling_core::{
  grain::{FactTable, GrainSpec},
  star::{ALL_KEY, Dimension, DimensionRow, FactRow, time_key},
  store::MartStore,
};

use crate::{Error, Result, aggregate::GroupedTotal};

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Natural name → surrogate key for one dimension, read back from the
/// already-built dimension table.
pub struct DimensionLookup {
  dimension: Dimension,
  keys:      HashMap<String, i64>,
}

impl DimensionLookup {
  /// Read the committed dimension rows back from the store; the loader
  /// resolves against what was committed, not the builder's in-memory
  /// output.
  pub fn from_store<S: MartStore>(
    store: &S,
    dimension: Dimension,
  ) -> Result<Self> {
    let rows = store.dimension_rows(dimension).map_err(Error::store)?;
    Ok(Self::from_rows(dimension, rows))
  }

  pub fn from_rows(dimension: Dimension, rows: Vec<DimensionRow>) -> Self {
    let keys = rows
      .into_iter()
      .filter(|r| !r.is_all())
      .map(|r| (r.name, r.key))
      .collect();
    Self { dimension, keys }
  }

  /// Resolve an optional natural name. `None` is the roll-up sentinel; a
  /// miss is a resolution failure for `view`.
  pub fn resolve(
    &self,
    name: Option<&str>,
    view: &'static str,
  ) -> Result<i64> {
    match name {
      None => Ok(ALL_KEY),
      Some(name) => {
        self.keys.get(name).copied().ok_or_else(|| Error::Resolution {
          view,
          dimension: self.dimension.name(),
          key: name.to_string(),
        })
      }
    }
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Resolve one view's grouped totals into fact rows.
pub fn resolve_view(
  groups: &[GroupedTotal],
  spec: &GrainSpec,
  primary: &DimensionLookup,
  secondary: &DimensionLookup,
) -> Result<Vec<FactRow>> {
  groups
    .iter()
    .map(|g| {
      Ok(FactRow {
        primary_key:   primary.resolve(g.primary.as_deref(), spec.name)?,
        time_key:      time_key(g.year, g.quarter),
        secondary_key: secondary
          .resolve(g.secondary.as_deref(), spec.name)?,
        total_sold:    g.total_sold,
      })
    })
    .collect()
}

/// Resolve and append one view to its fact table, returning the number
/// of rows loaded.
pub fn load_view<S: MartStore>(
  store: &S,
  table: FactTable,
  spec: &GrainSpec,
  groups: &[GroupedTotal],
  primary: &DimensionLookup,
  secondary: &DimensionLookup,
) -> Result<usize> {
  let rows = resolve_view(groups, spec, primary, secondary)?;
  store.append_facts(table, &rows).map_err(Error::store)?;
  Ok(rows.len())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
