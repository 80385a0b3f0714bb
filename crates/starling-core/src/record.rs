//! Flat source records — the output contract of the XML ingestion layer.
//!
//! These are the shapes `starling-xml` produces and the normalized store
//! consumes. They carry natural keys only; surrogate keys exist nowhere
//! outside the star schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A sales representative as it appears in the reps source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepRecord {
  /// Natural key, e.g. `"R104"`.
  pub rep_id:     String,
  pub first_name: String,
  pub last_name:  String,
  /// Name of the territory the rep belongs to.
  pub territory:  String,
}

impl RepRecord {
  /// Display name, used as the rep dimension's natural key.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single sales transaction as it appears in a transactions source file.
///
/// `txn_id` arrives already prefixed per source file by the ingestion
/// layer, so ids stay globally unique when several transaction files are
/// loaded in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxnRecord {
  pub txn_id:   String,
  pub date:     NaiveDate,
  pub customer: String,
  pub product:  String,
  pub quantity: i64,
  /// Amount in integer currency units (whole dollars).
  pub amount:   i64,
  /// Country of the purchasing customer.
  pub country:  String,
  pub rep_id:   String,
}
