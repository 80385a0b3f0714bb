//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 (`YYYY-MM-DD`) text, quarters as their
//! `Q1`..`Q4` labels, and sentinel levels of the date dimension as NULL.

use chrono::NaiveDate;
use starling_core::{
  star::{DateDimRow, Quarter},
  store::TxnFact,
};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Quarters ────────────────────────────────────────────────────────────────

pub fn encode_quarter(q: Quarter) -> &'static str { q.label() }

pub fn decode_quarter(s: &str) -> Result<Quarter> {
  Ok(Quarter::from_label(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `date_dim` row.
pub struct RawDateDim {
  pub time_id: String,
  pub year:    Option<i64>,
  pub quarter: Option<String>,
}

impl RawDateDim {
  pub fn into_row(self) -> Result<DateDimRow> {
    Ok(DateDimRow {
      time_id: self.time_id,
      year:    self.year.map(|y| y as i32),
      quarter: self
        .quarter
        .as_deref()
        .map(decode_quarter)
        .transpose()?,
    })
  }
}

/// Raw values read from the joined transaction-fact query.
pub struct RawTxnFact {
  pub product: String,
  pub region:  String,
  pub rep:     String,
  pub date:    String,
  pub amount:  i64,
}

impl RawTxnFact {
  pub fn into_fact(self) -> Result<TxnFact> {
    Ok(TxnFact {
      product: self.product,
      region:  self.region,
      rep:     self.rep,
      date:    decode_date(&self.date)?,
      amount:  self.amount,
    })
  }
}
