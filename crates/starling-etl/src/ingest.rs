//! Source-file loading: read the configured XML documents and hand the
//! flat records to the pipeline.

use std::path::{Path, PathBuf};

use starling_core::record::{RepRecord, TxnRecord};
use tracing::info;

use crate::{Error, Result};

/// Load the reps source file.
pub fn load_reps(path: &Path) -> Result<Vec<RepRecord>> {
  let raw = read(path)?;
  let reps = starling_xml::parse_reps(&raw)?;
  info!(path = %path.display(), reps = reps.len(), "reps loaded");
  Ok(reps)
}

/// Load every transactions file, prefixing txn ids with the file stem so
/// they stay unique across files.
pub fn load_transactions(paths: &[PathBuf]) -> Result<Vec<TxnRecord>> {
  let mut txns = Vec::new();
  for path in paths {
    let raw = read(path)?;
    let parsed = starling_xml::parse_transactions(&raw, &file_prefix(path))?;
    info!(
      path = %path.display(),
      transactions = parsed.len(),
      "transactions loaded"
    );
    txns.extend(parsed);
  }
  Ok(txns)
}

fn read(path: &Path) -> Result<String> {
  std::fs::read_to_string(path)
    .map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

/// Per-file txn-id prefix: the file stem, falling back to the whole file
/// name.
fn file_prefix(path: &Path) -> String {
  path
    .file_stem()
    .unwrap_or(path.as_os_str())
    .to_string_lossy()
    .into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_prefix_is_the_stem() {
    assert_eq!(file_prefix(Path::new("data/txn-2020.xml")), "txn-2020");
    assert_eq!(file_prefix(Path::new("txn")), "txn");
  }

  #[test]
  fn missing_file_reports_its_path() {
    let err = load_reps(Path::new("no-such-reps.xml")).unwrap_err();
    assert!(matches!(
      err,
      Error::Io { ref path, .. } if path == Path::new("no-such-reps.xml")
    ));
  }
}
