//! The Starling ETL pipeline.
//!
//! Orchestrates one batch run: XML source files → normalized SQLite
//! store → star schema (dimensions with ALL roll-up sentinels, then
//! sixteen pre-aggregated fact views), plus the two reporting reads the
//! chart layer consumes.
//!
//! Single-threaded, synchronous, full rebuild per run. All errors are
//! fatal and propagate to the entry point: silently-wrong aggregates are
//! worse than a failed run.

pub mod aggregate;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod ingest;
pub mod pipeline;
pub mod report;

pub use error::{Error, Result};

use std::path::PathBuf;

use serde::Deserialize;

/// Runtime configuration, deserialised from `etl.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
  /// SQLite database file holding both the normalized store and the
  /// star schema.
  pub store_path:        PathBuf,
  /// The reps source document.
  pub reps_file:         PathBuf,
  /// Transaction source documents; txn ids are prefixed per file.
  pub transaction_files: Vec<PathBuf>,
}
