//! XML → flat-record codec for Starling.
//!
//! Converts the semi-structured sales source files into
//! [`starling_core::record`] types. Pure and synchronous; no database
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let xml = std::fs::read_to_string("txn-q1.xml").unwrap();
//! let txns = starling_xml::parse_transactions(&xml, "txn-q1").unwrap();
//! println!("{} transactions", txns.len());
//! ```
//!
//! Malformed input is fatal for the whole document: the pipeline favours
//! a failed run over silently dropped or coerced records.

pub mod error;
mod parse;

pub use error::{Error, Result};
use starling_core::record::{RepRecord, TxnRecord};

/// Parse a `<salesreps>` document into rep records.
pub fn parse_reps(input: &str) -> Result<Vec<RepRecord>> {
  parse::parse_reps(input)
}

/// Parse a `<transactions>` document into transaction records.
///
/// Every local `txnID` is prefixed with `{source}-` so ids stay globally
/// unique when several transaction files are loaded into one run.
pub fn parse_transactions(
  input: &str,
  source: &str,
) -> Result<Vec<TxnRecord>> {
  parse::parse_transactions(input, source)
}
