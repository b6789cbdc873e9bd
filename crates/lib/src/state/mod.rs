//! Installation records and state reconciliation.
//!
//! Every installed component owns one plain-text record, named by its ID, in
//! the records directory of the install root.
//!
//! # Storage Layout
//!
//! ```text
//! <install_root>/
//! ├── Components/
//! │   └── core-server-gamezip
//! └── Server/Bin/...
//! ```
//!
//! # Example Record
//!
//! ```text
//! 1A2B3C4D 4096 core-database
//! Server/Bin/php.exe
//! Server/Bin/php.ini
//! ```
//!
//! The header holds the content hash, the install size and the dependency
//! IDs at install time. Each following line is a file path relative to the
//! install root.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::RECORDS_DIR;
use crate::manifest::{Catalog, InstallState};

/// Errors that can occur when working with installation records.
#[derive(Debug, Error)]
pub enum RecordError {
  /// The component ID cannot be used as a record file name.
  #[error("component id '{0}' is not a valid record name")]
  InvalidId(String),

  #[error("failed to read installation record {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write installation record {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove installation record {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// First line of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
  pub hash: String,
  pub install_size: u64,
  pub dependencies: Vec<String>,
}

impl RecordHeader {
  /// Parse a header line. Missing or malformed fields default to empty/zero.
  pub fn parse(line: &str) -> Self {
    let mut fields = line.trim_end_matches(['\r', '\n']).split(' ');
    let hash = fields.next().unwrap_or_default().to_string();
    let install_size = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0);
    let dependencies = fields.filter(|f| !f.is_empty()).map(str::to_string).collect();

    Self {
      hash,
      install_size,
      dependencies,
    }
  }

  pub fn render(&self) -> String {
    let mut fields = vec![self.hash.clone(), self.install_size.to_string()];
    fields.extend(self.dependencies.iter().cloned());
    fields.join(" ")
  }
}

/// A complete installation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
  pub header: RecordHeader,
  /// Installed files relative to the install root, `/`-separated.
  pub files: Vec<String>,
}

impl InstallRecord {
  pub fn parse(content: &str) -> Self {
    let mut lines = content.lines();
    let header = RecordHeader::parse(lines.next().unwrap_or_default());
    let files = lines
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(str::to_string)
      .collect();

    Self { header, files }
  }

  pub fn render(&self) -> String {
    let mut out = self.header.render();
    out.push('\n');
    for file in &self.files {
      out.push_str(file);
      out.push('\n');
    }
    out
  }
}

/// Directory holding all records under `install_root`.
pub fn records_dir(install_root: &Path) -> PathBuf {
  install_root.join(RECORDS_DIR)
}

/// Path of the record for component `id`.
pub fn record_path(install_root: &Path, id: &str) -> Result<PathBuf, RecordError> {
  let invalid = id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']);
  if invalid {
    return Err(RecordError::InvalidId(id.to_string()));
  }
  Ok(records_dir(install_root).join(id))
}

/// Read only the header line of a record.
///
/// Returns `Ok(None)` if the component has no record.
pub fn read_header(install_root: &Path, id: &str) -> Result<Option<RecordHeader>, RecordError> {
  let path = record_path(install_root, id)?;
  let file = match fs::File::open(&path) {
    Ok(file) => file,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => return Err(RecordError::Read { path, source }),
  };

  let mut line = String::new();
  BufReader::new(file)
    .read_line(&mut line)
    .map_err(|source| RecordError::Read { path, source })?;
  Ok(Some(RecordHeader::parse(&line)))
}

/// Load the full record for component `id`.
///
/// Returns `Ok(None)` if the record doesn't exist.
pub fn load_record(install_root: &Path, id: &str) -> Result<Option<InstallRecord>, RecordError> {
  let path = record_path(install_root, id)?;
  match fs::read_to_string(&path) {
    Ok(content) => {
      let record = InstallRecord::parse(&content);
      debug!(id = %id, files = record.files.len(), "installation record loaded");
      Ok(Some(record))
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(RecordError::Read { path, source }),
  }
}

/// Save the record for component `id`.
///
/// Writes to a temporary file first and renames it into place so a crash
/// never leaves a truncated record behind.
pub fn save_record(install_root: &Path, id: &str, record: &InstallRecord) -> Result<(), RecordError> {
  let path = record_path(install_root, id)?;
  let write_err = |source| RecordError::Write {
    path: path.clone(),
    source,
  };

  fs::create_dir_all(records_dir(install_root)).map_err(write_err)?;

  let temp_path = records_dir(install_root).join(format!(".{}.tmp", id));
  fs::write(&temp_path, record.render()).map_err(write_err)?;
  fs::rename(&temp_path, &path).map_err(write_err)?;

  info!(id = %id, files = record.files.len(), "installation record saved");
  Ok(())
}

/// Delete the record for component `id`. Succeeds if it is already gone.
pub fn remove_record(install_root: &Path, id: &str) -> Result<(), RecordError> {
  let path = record_path(install_root, id)?;
  match fs::remove_file(&path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(RecordError::Remove { path, source }),
  }
}

/// Annotate every catalog component with its local install state.
///
/// Reads record headers only; the filesystem is never modified.
pub fn reconcile(catalog: &mut Catalog, install_root: &Path) {
  for component in catalog.iter_mut() {
    component.state = match read_header(install_root, &component.id) {
      Ok(None) => InstallState::NotInstalled,
      Ok(Some(header)) if header.hash == component.hash => InstallState::Current,
      Ok(Some(header)) => {
        debug!(
          id = %component.id,
          installed = %header.hash,
          available = %component.hash,
          "component is stale"
        );
        InstallState::Stale {
          previous_install_size: header.install_size,
        }
      }
      Err(RecordError::InvalidId(_)) => InstallState::NotInstalled,
      Err(e) => {
        warn!(id = %component.id, error = %e, "unreadable installation record, assuming current");
        InstallState::Current
      }
    };
  }
}
