//! Record-driven removal of installed files.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::state::{RecordError, load_record, record_path};
use crate::util::{from_record_line, is_strictly_within};

/// A deletion that failed for a reason other than the file being absent.
#[derive(Debug)]
pub struct RemoveFailure {
  pub path: PathBuf,
  pub source: io::Error,
}

impl fmt::Display for RemoveFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "failed to delete {}: {}", self.path.display(), self.source)
  }
}

/// What a removal did.
#[derive(Debug, Default)]
pub struct RemoveReport {
  /// Files deleted.
  pub removed: usize,
  /// Files listed in the record that were already gone.
  pub missing: usize,
  /// Record lines pointing outside the install root; never deleted.
  pub refused: Vec<String>,
  pub failures: Vec<RemoveFailure>,
}

impl RemoveReport {
  pub fn is_clean(&self) -> bool {
    self.refused.is_empty() && self.failures.is_empty()
  }

  fn fail(&mut self, path: PathBuf, source: io::Error) {
    warn!(path = %path.display(), error = %source, "failed to delete");
    self.failures.push(RemoveFailure { path, source });
  }
}

/// Delete the files recorded for `id`, then the record itself.
pub(super) fn remove_component(root: &Path, id: &str) -> RemoveReport {
  let mut report = RemoveReport::default();

  let files = match load_record(root, id) {
    Ok(Some(record)) => record.files,
    Ok(None) => {
      debug!(id = %id, "no installation record");
      Vec::new()
    }
    Err(RecordError::Read { path, source }) => {
      report.fail(path, source);
      Vec::new()
    }
    Err(e) => {
      debug!(id = %id, error = %e, "record unavailable");
      Vec::new()
    }
  };

  for line in &files {
    let Some(path) = from_record_line(root, line) else {
      warn!(id = %id, line = %line, "refusing to delete path outside install root");
      report.refused.push(line.clone());
      continue;
    };
    match delete_and_prune(root, &path) {
      Ok(true) => report.removed += 1,
      Ok(false) => report.missing += 1,
      Err(source) => report.fail(path, source),
    }
  }

  if let Ok(path) = record_path(root, id)
    && let Err(source) = delete_and_prune(root, &path)
  {
    report.fail(path, source);
  }

  debug!(
    id = %id,
    removed = report.removed,
    missing = report.missing,
    failures = report.failures.len(),
    "component files removed"
  );
  report
}

/// Delete one file and prune the directories it leaves empty.
///
/// Returns `Ok(false)` if the file was already gone.
fn delete_and_prune(root: &Path, path: &Path) -> io::Result<bool> {
  let deleted = match fs::remove_file(path) {
    Ok(()) => {
      trace!(path = %path.display(), "deleted");
      true
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => false,
    Err(e) => return Err(e),
  };

  if let Some(parent) = path.parent() {
    prune_empty_dirs(root, parent);
  }
  Ok(deleted)
}

/// Remove `dir` and its ancestors while they are empty, never touching `root`.
fn prune_empty_dirs(root: &Path, dir: &Path) {
  let mut current = Some(dir);

  while let Some(dir) = current {
    if !is_strictly_within(root, dir) {
      break;
    }
    let empty = match fs::read_dir(dir) {
      Ok(mut entries) => entries.next().is_none(),
      Err(_) => false,
    };
    if !empty || fs::remove_dir(dir).is_err() {
      break;
    }
    trace!(dir = %dir.display(), "pruned empty directory");
    current = dir.parent();
  }
}
