//! Archive validation and extraction.

use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::ZipArchive;

use super::InstallError;
use crate::util::{is_strictly_within, normalize_path};

/// A file entry that passed validation.
#[derive(Debug)]
pub(super) struct PlannedEntry {
  index: usize,
  target: PathBuf,
}

/// Check every entry of `archive` before anything is written.
///
/// Directory entries are dropped. Each file entry must resolve strictly
/// beneath `destination`.
pub(super) fn validate<R: Read + Seek>(
  archive: &mut ZipArchive<R>,
  destination: &Path,
  id: &str,
) -> Result<Vec<PlannedEntry>, InstallError> {
  let mut planned = Vec::with_capacity(archive.len());

  for index in 0..archive.len() {
    let entry = archive.by_index(index).map_err(|source| InstallError::Archive {
      id: id.to_string(),
      source,
    })?;
    if entry.is_dir() {
      continue;
    }

    let unsafe_entry = || InstallError::UnsafeEntry {
      id: id.to_string(),
      entry: entry.name().to_string(),
    };
    let relative = entry.enclosed_name().ok_or_else(unsafe_entry)?;
    let target = normalize_path(&destination.join(relative));
    if !is_strictly_within(destination, &target) {
      return Err(unsafe_entry());
    }

    planned.push(PlannedEntry { index, target });
  }

  debug!(id = %id, files = planned.len(), "archive validated");
  Ok(planned)
}

/// Write validated entries to disk, returning the paths written in order.
pub(super) fn extract<R: Read + Seek>(
  archive: &mut ZipArchive<R>,
  entries: &[PlannedEntry],
  id: &str,
) -> Result<Vec<PathBuf>, InstallError> {
  let mut written = Vec::with_capacity(entries.len());

  for planned in entries {
    let io_err = |source| InstallError::Io {
      path: planned.target.clone(),
      source,
    };

    let mut entry = archive.by_index(planned.index).map_err(|source| InstallError::Archive {
      id: id.to_string(),
      source,
    })?;

    if let Some(parent) = planned.target.parent() {
      fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut out = fs::File::create(&planned.target).map_err(io_err)?;
    io::copy(&mut entry, &mut out).map_err(io_err)?;

    trace!(path = %planned.target.display(), "extracted");
    written.push(planned.target.clone());
  }

  Ok(written)
}
