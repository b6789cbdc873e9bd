//! Installing and removing components on disk.
//!
//! Installing downloads the component archive to a temporary file, validates
//! every entry, extracts it under the component's directory and writes the
//! installation record. Removing replays the record in reverse.

mod extract;
mod remove;

use std::io::{self, Seek};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::fetch::{FetchError, Fetcher};
use crate::manifest::Component;
use crate::state::{InstallRecord, RecordError, RecordHeader, save_record};
use crate::util::{is_within, normalize_path, to_record_line};

pub use remove::{RemoveFailure, RemoveReport};

/// Errors that fail a single component install.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("failed to download {id}: {source}")]
  Fetch {
    id: String,
    #[source]
    source: FetchError,
  },

  #[error("failed to read archive for {id}: {source}")]
  Archive {
    id: String,
    #[source]
    source: ZipError,
  },

  /// The component's install directory resolves outside the install root.
  #[error("install directory '{directory}' of {id} is outside the install root")]
  UnsafeDirectory { id: String, directory: String },

  /// An archive entry would be written outside the component's directory.
  #[error("archive for {id} contains unsafe entry '{entry}'")]
  UnsafeEntry { id: String, entry: String },

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Record(#[from] RecordError),
}

/// Result of a successful install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
  /// The component has no content; nothing was fetched or written.
  Skipped,
  /// The archive was extracted and the record written.
  Installed { files: usize },
}

/// Installs and removes components beneath a fixed install root.
pub struct Installer<'f> {
  root: PathBuf,
  fetcher: &'f dyn Fetcher,
}

impl<'f> Installer<'f> {
  pub fn new(root: impl Into<PathBuf>, fetcher: &'f dyn Fetcher) -> Self {
    let root = root.into();
    let root = normalize_path(&std::path::absolute(&root).unwrap_or(root));
    Self { root, fetcher }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory the component's archive is extracted into.
  fn destination(&self, component: &Component) -> Result<PathBuf, InstallError> {
    let relative: PathBuf = component
      .directory
      .split(['/', '\\'])
      .filter(|part| !part.is_empty())
      .collect();
    let destination = normalize_path(&self.root.join(relative));

    if !is_within(&self.root, &destination) {
      return Err(InstallError::UnsafeDirectory {
        id: component.id.clone(),
        directory: component.directory.clone(),
      });
    }
    Ok(destination)
  }

  /// Download and extract `component`, then record what was written.
  ///
  /// A component with an install size of zero is skipped without fetching
  /// anything. A rejected archive leaves no files behind.
  pub fn install(&self, component: &Component) -> Result<InstallOutcome, InstallError> {
    if component.install_size == 0 {
      debug!(id = %component.id, "nothing to install");
      return Ok(InstallOutcome::Skipped);
    }

    let destination = self.destination(component)?;

    let temp_err = |source| InstallError::Io {
      path: std::env::temp_dir(),
      source,
    };
    let mut download = tempfile::tempfile().map_err(temp_err)?;
    let bytes = self
      .fetcher
      .fetch(&component.url, &mut download)
      .map_err(|source| InstallError::Fetch {
        id: component.id.clone(),
        source,
      })?;
    download.rewind().map_err(temp_err)?;
    debug!(id = %component.id, bytes, "archive downloaded");

    let mut archive = ZipArchive::new(download).map_err(|source| InstallError::Archive {
      id: component.id.clone(),
      source,
    })?;
    let entries = extract::validate(&mut archive, &destination, &component.id)?;
    let written = extract::extract(&mut archive, &entries, &component.id)?;

    let record = InstallRecord {
      header: RecordHeader {
        hash: component.hash.clone(),
        install_size: component.install_size,
        dependencies: component.dependencies.clone(),
      },
      files: written.iter().filter_map(|path| to_record_line(&self.root, path)).collect(),
    };
    save_record(&self.root, &component.id, &record)?;

    info!(id = %component.id, files = record.files.len(), "component installed");
    Ok(InstallOutcome::Installed {
      files: record.files.len(),
    })
  }

  /// Delete everything the record of `component` lists, then the record.
  ///
  /// Never fails as a whole; problems are collected in the report.
  pub fn remove(&self, component: &Component) -> RemoveReport {
    let report = remove::remove_component(&self.root, &component.id);
    info!(id = %component.id, removed = report.removed, "component removed");
    report
  }
}
