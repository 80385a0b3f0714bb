//! The enumerated reporting grains.
//!
//! Each fact table materialises eight marginal aggregate views over the
//! transaction-grain data. A view is described declaratively by a
//! [`GrainSpec`]: which dimensions are grouped, and at what time grain.
//! Every ungrouped dimension is bound to the "ALL" sentinel at load time,
//! so the reporting layer never runs a GROUP BY — each report query is a
//! constant-shape lookup keyed by sentinel-vs-real surrogate keys.

use crate::star::Dimension;

// ─── Fact tables ─────────────────────────────────────────────────────────────

/// The two fact tables of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactTable {
  /// `product_facts(product_key, time_key, region_key, totalSold)`.
  Product,
  /// `rep_facts(rep_key, time_key, product_key, totalSold)`.
  Rep,
}

impl FactTable {
  pub fn name(self) -> &'static str {
    match self {
      Self::Product => "product_facts",
      Self::Rep => "rep_facts",
    }
  }

  /// The dimension behind the table's first key column.
  pub fn primary(self) -> Dimension {
    match self {
      Self::Product => Dimension::Product,
      Self::Rep => Dimension::Rep,
    }
  }

  /// The dimension behind the table's third key column.
  pub fn secondary(self) -> Dimension {
    match self {
      Self::Product => Dimension::Region,
      Self::Rep => Dimension::Product,
    }
  }

  /// The views this table materialises.
  pub fn grains(self) -> &'static [GrainSpec; 8] {
    match self {
      Self::Product => &PRODUCT_GRAINS,
      Self::Rep => &REP_GRAINS,
    }
  }
}

// ─── Grain specs ─────────────────────────────────────────────────────────────

/// Time grain of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeGrain {
  /// Group by (year, quarter).
  Quarter,
  /// Group by year; the quarter level is bound to ALL.
  Year,
  /// No time grouping; the time key is "ALL-ALL".
  All,
}

/// Declarative description of one aggregate view.
#[derive(Debug, Clone, Copy)]
pub struct GrainSpec {
  /// Stable identifier used in logs and resolution errors.
  pub name:      &'static str,
  /// Group by the table's primary dimension.
  pub primary:   bool,
  /// Group by the table's secondary dimension.
  pub secondary: bool,
  pub time:      TimeGrain,
}

/// The eight views of `product_facts`, dimensions (product, time, region).
pub const PRODUCT_GRAINS: [GrainSpec; 8] = [
  GrainSpec { name: "product-quarter-region", primary: true,  secondary: true,  time: TimeGrain::Quarter },
  GrainSpec { name: "product-quarter",        primary: true,  secondary: false, time: TimeGrain::Quarter },
  GrainSpec { name: "quarter",                primary: false, secondary: false, time: TimeGrain::Quarter },
  GrainSpec { name: "product-year",           primary: true,  secondary: false, time: TimeGrain::Year },
  GrainSpec { name: "year",                   primary: false, secondary: false, time: TimeGrain::Year },
  GrainSpec { name: "product",                primary: true,  secondary: false, time: TimeGrain::All },
  GrainSpec { name: "region",                 primary: false, secondary: true,  time: TimeGrain::All },
  GrainSpec { name: "grand-total",            primary: false, secondary: false, time: TimeGrain::All },
];

/// The eight views of `rep_facts`, dimensions (rep, time, product).
pub const REP_GRAINS: [GrainSpec; 8] = [
  GrainSpec { name: "rep-product-quarter", primary: true,  secondary: true,  time: TimeGrain::Quarter },
  GrainSpec { name: "quarter",             primary: false, secondary: false, time: TimeGrain::Quarter },
  GrainSpec { name: "rep-quarter",         primary: true,  secondary: false, time: TimeGrain::Quarter },
  GrainSpec { name: "rep-year",            primary: true,  secondary: false, time: TimeGrain::Year },
  GrainSpec { name: "year",                primary: false, secondary: false, time: TimeGrain::Year },
  GrainSpec { name: "rep",                 primary: true,  secondary: false, time: TimeGrain::All },
  GrainSpec { name: "product",             primary: false, secondary: true,  time: TimeGrain::All },
  GrainSpec { name: "grand-total",         primary: false, secondary: false, time: TimeGrain::All },
];

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_table_has_exactly_one_grand_total_view() {
    for table in [FactTable::Product, FactTable::Rep] {
      let grand: Vec<_> = table
        .grains()
        .iter()
        .filter(|s| !s.primary && !s.secondary && s.time == TimeGrain::All)
        .collect();
      assert_eq!(grand.len(), 1);
      assert_eq!(grand[0].name, "grand-total");
    }
  }

  #[test]
  fn view_names_are_unique_per_table() {
    for table in [FactTable::Product, FactTable::Rep] {
      let mut names: Vec<_> =
        table.grains().iter().map(|s| s.name).collect();
      names.sort_unstable();
      names.dedup();
      assert_eq!(names.len(), 8);
    }
  }

  #[test]
  fn product_table_full_detail_groups_everything() {
    let detail = &PRODUCT_GRAINS[0];
    assert!(detail.primary && detail.secondary);
    assert_eq!(detail.time, TimeGrain::Quarter);
  }

  #[test]
  fn secondary_dimension_differs_per_table() {
    assert_eq!(FactTable::Product.secondary(), Dimension::Region);
    assert_eq!(FactTable::Rep.secondary(), Dimension::Product);
  }
}
