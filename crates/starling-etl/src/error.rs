//! Error types for `starling-etl`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] starling_core::Error),

  #[error("xml error: {0}")]
  Xml(#[from] starling_xml::Error),

  /// Backend failure, crossed over from the `MartStore` implementation.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

  /// An aggregated natural key had no dimension row. Signals that the
  /// dimension build ran incompletely or the source contains a name not
  /// captured upstream; the view's load aborts rather than emitting a
  /// row with a bogus key.
  #[error("view {view}: no {dimension} dimension row matches {key:?}")]
  Resolution {
    view:      &'static str,
    dimension: &'static str,
    key:       String,
  },

  /// Both grand-total rows must equal the sum of amount over all
  /// transactions — they derive from the same transaction set.
  #[error(
    "grand totals disagree: product_facts={product}, rep_facts={rep}, \
     transactions={source_total}"
  )]
  ConsistencyCheck { product: i64, rep: i64, source_total: i64 },

  #[error("reading {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    source: std::io::Error,
  },
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
