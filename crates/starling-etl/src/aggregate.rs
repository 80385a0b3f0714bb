//! The grain aggregator.
//!
//! One configuration-driven routine computes every view: the prepared
//! transaction rows are folded into a map keyed by the spec's grouped
//! columns, with ungrouped columns held at `None`. The fact loader then
//! binds every `None` to the ALL sentinel, so a single fact table stores
//! all of its grains side by side.

use std::collections::BTreeMap;

use chrono::Datelike as _;
use starling_core::{
  grain::{FactTable, GrainSpec, TimeGrain},
  star::Quarter,
  store::TxnFact,
};

use crate::Result;

// ─── Preparation ─────────────────────────────────────────────────────────────

/// A transaction with its reporting period derived once.
///
/// This is the only place a quarter is ever derived from a date; the date
/// dimension builder and the aggregator both reuse the value.
#[derive(Debug, Clone)]
pub struct PreparedTxn {
  pub product: String,
  pub region:  String,
  pub rep:     String,
  pub year:    i32,
  pub quarter: Quarter,
  pub amount:  i64,
}

/// Derive the reporting period for every transaction fact.
pub fn prepare(facts: Vec<TxnFact>) -> Result<Vec<PreparedTxn>> {
  facts
    .into_iter()
    .map(|f| {
      let quarter = Quarter::from_month(f.date.month())?;
      Ok(PreparedTxn {
        product: f.product,
        region:  f.region,
        rep:     f.rep,
        year:    f.date.year(),
        quarter,
        amount:  f.amount,
      })
    })
    .collect()
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// One output row of a view. `None` marks a dimension the view does not
/// group by; the fact loader binds it to the ALL sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedTotal {
  pub primary:    Option<String>,
  pub secondary:  Option<String>,
  pub year:       Option<i32>,
  pub quarter:    Option<Quarter>,
  pub total_sold: i64,
}

/// Compute one aggregate view: `SUM(amount)` over `rows`, grouped by the
/// dimensions `spec` selects for `table`.
pub fn aggregate(
  rows: &[PreparedTxn],
  table: FactTable,
  spec: &GrainSpec,
) -> Vec<GroupedTotal> {
  type Key = (Option<String>, Option<String>, Option<i32>, Option<Quarter>);
  let mut totals: BTreeMap<Key, i64> = BTreeMap::new();

  for row in rows {
    let primary = spec.primary.then(|| match table {
      FactTable::Product => row.product.clone(),
      FactTable::Rep => row.rep.clone(),
    });
    let secondary = spec.secondary.then(|| match table {
      FactTable::Product => row.region.clone(),
      FactTable::Rep => row.product.clone(),
    });
    let (year, quarter) = match spec.time {
      TimeGrain::Quarter => (Some(row.year), Some(row.quarter)),
      TimeGrain::Year => (Some(row.year), None),
      TimeGrain::All => (None, None),
    };

    *totals.entry((primary, secondary, year, quarter)).or_insert(0) +=
      row.amount;
  }

  totals
    .into_iter()
    .map(|((primary, secondary, year, quarter), total_sold)| {
      GroupedTotal { primary, secondary, year, quarter, total_sold }
    })
    .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use starling_core::grain::{PRODUCT_GRAINS, REP_GRAINS};

  use super::*;

  fn prepared(
    product: &str,
    region: &str,
    rep: &str,
    year: i32,
    quarter: Quarter,
    amount: i64,
  ) -> PreparedTxn {
    PreparedTxn {
      product: product.into(),
      region: region.into(),
      rep: rep.into(),
      year,
      quarter,
      amount,
    }
  }

  fn fixture() -> Vec<PreparedTxn> {
    vec![
      prepared("Aspirin", "USA", "Jane Doe", 2020, Quarter::Q1, 100),
      prepared("Ibuprofen", "Canada", "Ken Akamatsu", 2020, Quarter::Q2, 200),
      prepared("Aspirin", "USA", "Jane Doe", 2021, Quarter::Q1, 50),
    ]
  }

  #[test]
  fn full_detail_view_groups_all_three_dimensions() {
    let groups = aggregate(&fixture(), FactTable::Product, &PRODUCT_GRAINS[0]);
    assert_eq!(groups.len(), 3);

    let aspirin_q1 = groups
      .iter()
      .find(|g| {
        g.primary.as_deref() == Some("Aspirin") && g.year == Some(2020)
      })
      .unwrap();
    assert_eq!(aspirin_q1.secondary.as_deref(), Some("USA"));
    assert_eq!(aspirin_q1.quarter, Some(Quarter::Q1));
    assert_eq!(aspirin_q1.total_sold, 100);
  }

  #[test]
  fn grand_total_view_collapses_to_one_row() {
    let groups = aggregate(&fixture(), FactTable::Product, &PRODUCT_GRAINS[7]);
    assert_eq!(groups.len(), 1);
    let grand = &groups[0];
    assert_eq!(grand.primary, None);
    assert_eq!(grand.secondary, None);
    assert_eq!(grand.year, None);
    assert_eq!(grand.quarter, None);
    assert_eq!(grand.total_sold, 350);
  }

  #[test]
  fn yearly_view_drops_the_quarter_level() {
    // (year) view: 2020 → 300, 2021 → 50.
    let groups = aggregate(&fixture(), FactTable::Product, &PRODUCT_GRAINS[4]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].year, Some(2020));
    assert_eq!(groups[0].quarter, None);
    assert_eq!(groups[0].total_sold, 300);
    assert_eq!(groups[1].year, Some(2021));
    assert_eq!(groups[1].total_sold, 50);
  }

  #[test]
  fn rep_table_swaps_primary_and_secondary_domains() {
    // (rep) view over the rep table.
    let groups = aggregate(&fixture(), FactTable::Rep, &REP_GRAINS[5]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].primary.as_deref(), Some("Jane Doe"));
    assert_eq!(groups[0].total_sold, 150);
    assert_eq!(groups[1].primary.as_deref(), Some("Ken Akamatsu"));
    assert_eq!(groups[1].total_sold, 200);
  }

  #[test]
  fn prepare_derives_period_once_per_transaction() {
    let facts = vec![TxnFact {
      product: "Aspirin".into(),
      region:  "USA".into(),
      rep:     "Jane Doe".into(),
      date:    chrono::NaiveDate::from_ymd_opt(2020, 11, 3).unwrap(),
      amount:  10,
    }];
    let prepared = prepare(facts).unwrap();
    assert_eq!(prepared[0].year, 2020);
    assert_eq!(prepared[0].quarter, Quarter::Q4);
  }

  #[test]
  fn every_view_conserves_the_total() {
    let rows = fixture();
    for (table, specs) in [
      (FactTable::Product, &PRODUCT_GRAINS),
      (FactTable::Rep, &REP_GRAINS),
    ] {
      for spec in specs {
        let sum: i64 = aggregate(&rows, table, spec)
          .iter()
          .map(|g| g.total_sold)
          .sum();
        assert_eq!(sum, 350, "view {} lost amount", spec.name);
      }
    }
  }
}
