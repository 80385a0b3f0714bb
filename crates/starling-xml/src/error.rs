//! Error types for the starling-xml codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed XML: {0}")]
  Xml(String),

  #[error("expected root element <{expected}>, found <{found}>")]
  UnexpectedRoot {
    expected: &'static str,
    found:    String,
  },

  #[error("<{record}> is missing required field {field:?}")]
  MissingField {
    record: &'static str,
    field:  &'static str,
  },

  #[error("invalid number in {field:?}: {value:?}")]
  InvalidNumber {
    field: &'static str,
    value: String,
  },

  #[error("invalid date {value:?} (expected MM/DD/YYYY)")]
  InvalidDate { value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
