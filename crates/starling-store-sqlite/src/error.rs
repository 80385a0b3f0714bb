//! Error type for `starling-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] starling_core::Error),

  /// Schema and connectivity failures both surface here; either way the
  /// run aborts. There is no retry policy.
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A transaction referenced a rep id with no record in the reps file.
  #[error("transaction {txn_id}: unknown rep id {rep_id:?}")]
  UnknownRep { txn_id: String, rep_id: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
