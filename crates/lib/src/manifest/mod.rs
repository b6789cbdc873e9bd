//! Component manifest loading.
//!
//! A manifest is fetched from the configured source, parsed into a flat
//! [`Catalog`], then reconciled against the installation records on disk.
//! The catalog is rebuilt on every invocation; nothing about it is persisted.

mod parse;
mod types;

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::fetch::{FetchError, Fetcher, fetch_bytes};
use crate::state::reconcile;

pub use parse::parse_manifest;
pub use types::*;

/// Errors that prevent a catalog from being built. All of them are fatal.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to fetch manifest: {0}")]
  Fetch(#[from] FetchError),

  #[error("malformed manifest: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("malformed manifest: no root element")]
  MissingRoot,

  #[error("malformed manifest: unexpected end of document with {depth} element(s) still open")]
  Unclosed { depth: usize },
}

/// Fetch, parse and reconcile the manifest at `source_url`.
pub fn load(fetcher: &dyn Fetcher, source_url: &str, install_root: &Path) -> Result<Catalog, ManifestError> {
  let data = fetch_bytes(fetcher, source_url)?;
  let mut catalog = parse_manifest(&data)?;
  reconcile(&mut catalog, install_root);

  info!(
    source = %source_url,
    components = catalog.len(),
    installed = catalog.iter().filter(|c| c.is_installed()).count(),
    stale = catalog.iter().filter(|c| c.is_stale()).count(),
    "catalog loaded"
  );
  Ok(catalog)
}
