//! Error types for `starling-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A derived quarter would fall outside the calendar. Quarters are never
  /// silently defaulted; this aborts the run.
  #[error("month {0} is outside the calendar range 1-12")]
  MonthOutOfRange(u32),

  #[error("unknown quarter label: {0:?}")]
  UnknownQuarter(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
