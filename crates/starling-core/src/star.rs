//! Star-schema types: dimension rows, the date roll-up lattice, fact rows.
//!
//! Every dimension reserves surrogate key 0 and the name "ALL" for its
//! roll-up sentinel. A fact row encodes its reporting grain by which of its
//! keys are sentinel vs. real; there are no separate summary tables.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Sentinels ───────────────────────────────────────────────────────────────

/// Surrogate key reserved for the "all members" roll-up row.
pub const ALL_KEY: i64 = 0;

/// Natural name of the roll-up row, also spliced into composite time keys.
pub const ALL_NAME: &str = "ALL";

// ─── Quarter ─────────────────────────────────────────────────────────────────

/// Calendar quarter, derived from the transaction month. Fiscal-year
/// overrides are not supported.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub enum Quarter {
  Q1,
  Q2,
  Q3,
  Q4,
}

impl Quarter {
  /// Derive the quarter for a calendar month.
  ///
  /// A month outside 1-12 is a data-integrity fault and fails the run —
  /// quarters are never silently defaulted.
  pub fn from_month(month: u32) -> Result<Self> {
    match month {
      1..=3 => Ok(Self::Q1),
      4..=6 => Ok(Self::Q2),
      7..=9 => Ok(Self::Q3),
      10..=12 => Ok(Self::Q4),
      other => Err(Error::MonthOutOfRange(other)),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Q1 => "Q1",
      Self::Q2 => "Q2",
      Self::Q3 => "Q3",
      Self::Q4 => "Q4",
    }
  }

  pub fn from_label(s: &str) -> Result<Self> {
    match s {
      "Q1" => Ok(Self::Q1),
      "Q2" => Ok(Self::Q2),
      "Q3" => Ok(Self::Q3),
      "Q4" => Ok(Self::Q4),
      other => Err(Error::UnknownQuarter(other.to_string())),
    }
  }
}

// ─── Time keys ───────────────────────────────────────────────────────────────

/// Compose the composite `date_dim` key from an optional year and quarter.
///
/// `None` selects the "ALL" sentinel at that level, so the full lattice is
/// addressable through one key: `"2020-Q1"`, `"2020-ALL"`, `"ALL-ALL"`.
pub fn time_key(year: Option<i32>, quarter: Option<Quarter>) -> String {
  let y = match year {
    Some(y) => y.to_string(),
    None => ALL_NAME.to_string(),
  };
  let q = match quarter {
    Some(q) => q.label(),
    None => ALL_NAME,
  };
  format!("{y}-{q}")
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

/// The three name dimensions of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
  Product,
  Region,
  Rep,
}

impl Dimension {
  /// Short name used in logs and resolution errors.
  pub fn name(self) -> &'static str {
    match self {
      Self::Product => "product",
      Self::Region => "region",
      Self::Rep => "rep",
    }
  }
}

/// One row of a name dimension: surrogate key plus natural name.
///
/// Real members get contiguous keys 1..N in insertion order; the ALL row
/// is always [`ALL_KEY`] and is inserted after the real members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRow {
  pub key:  i64,
  pub name: String,
}

impl DimensionRow {
  /// The roll-up sentinel row.
  pub fn all() -> Self {
    Self { key: ALL_KEY, name: ALL_NAME.to_string() }
  }

  pub fn is_all(&self) -> bool { self.key == ALL_KEY }
}

/// One row of the date dimension. `None` at either level means the "ALL"
/// sentinel; the composite key always carries the literal `ALL` there.
///
/// The full key space is the three-level roll-up lattice: every observed
/// (year, quarter), one (year, ALL) per observed year, and a single
/// (ALL, ALL) grand-total row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDimRow {
  pub time_id: String,
  pub year:    Option<i32>,
  pub quarter: Option<Quarter>,
}

impl DateDimRow {
  /// Detail row for an observed (year, quarter).
  pub fn detail(year: i32, quarter: Quarter) -> Self {
    Self {
      time_id: time_key(Some(year), Some(quarter)),
      year:    Some(year),
      quarter: Some(quarter),
    }
  }

  /// Yearly roll-up row.
  pub fn yearly(year: i32) -> Self {
    Self {
      time_id: time_key(Some(year), None),
      year:    Some(year),
      quarter: None,
    }
  }

  /// The single grand-total row.
  pub fn grand() -> Self {
    Self { time_id: time_key(None, None), year: None, quarter: None }
  }
}

// ─── Fact rows ───────────────────────────────────────────────────────────────

/// One fact row, shaped identically for both fact tables.
///
/// For `product_facts` the keys are (product, time, region); for
/// `rep_facts` they are (rep, time, product). The backend maps them onto
/// each table's concrete column names. There is no row-level primary key;
/// the grain is encoded by which keys are sentinel vs. real.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRow {
  pub primary_key:   i64,
  pub time_key:      String,
  pub secondary_key: i64,
  pub total_sold:    i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quarter_from_month_boundaries() {
    assert_eq!(Quarter::from_month(1).unwrap(), Quarter::Q1);
    assert_eq!(Quarter::from_month(3).unwrap(), Quarter::Q1);
    assert_eq!(Quarter::from_month(4).unwrap(), Quarter::Q2);
    assert_eq!(Quarter::from_month(6).unwrap(), Quarter::Q2);
    assert_eq!(Quarter::from_month(7).unwrap(), Quarter::Q3);
    assert_eq!(Quarter::from_month(9).unwrap(), Quarter::Q3);
    assert_eq!(Quarter::from_month(10).unwrap(), Quarter::Q4);
    assert_eq!(Quarter::from_month(12).unwrap(), Quarter::Q4);
  }

  #[test]
  fn quarter_from_month_out_of_range_errors() {
    assert!(matches!(
      Quarter::from_month(0),
      Err(Error::MonthOutOfRange(0))
    ));
    assert!(matches!(
      Quarter::from_month(13),
      Err(Error::MonthOutOfRange(13))
    ));
  }

  #[test]
  fn quarter_label_roundtrip() {
    for q in [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4] {
      assert_eq!(Quarter::from_label(q.label()).unwrap(), q);
    }
    assert!(matches!(
      Quarter::from_label("Q5"),
      Err(Error::UnknownQuarter(_))
    ));
  }

  #[test]
  fn time_key_composition() {
    assert_eq!(time_key(Some(2020), Some(Quarter::Q1)), "2020-Q1");
    assert_eq!(time_key(Some(2020), None), "2020-ALL");
    assert_eq!(time_key(None, None), "ALL-ALL");
  }

  #[test]
  fn date_dim_row_constructors() {
    assert_eq!(DateDimRow::detail(2021, Quarter::Q3).time_id, "2021-Q3");
    assert_eq!(DateDimRow::yearly(2021).time_id, "2021-ALL");
    assert_eq!(DateDimRow::grand().time_id, "ALL-ALL");
    assert_eq!(DateDimRow::grand().year, None);
    assert_eq!(DateDimRow::grand().quarter, None);
  }
}
