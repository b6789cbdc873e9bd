//! Shared utilities.
//!
//! Lexical path helpers used to keep archive entries and record lines inside
//! the install root, plus test helpers.

use std::path::{Component, Path, PathBuf};


/// Lexically normalize `path`, resolving `.` and `..` without touching the
/// filesystem.
///
/// A `..` that cannot be resolved against a preceding normal component is
/// kept, except directly after a root where it is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut components: Vec<Component<'_>> = Vec::new();

  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match components.last() {
        Some(Component::Normal(_)) => {
          components.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => components.push(component),
      },
      other => components.push(other),
    }
  }

  components.iter().collect()
}

/// True if `path` is `base` or lies beneath it, after normalization.
pub fn is_within(base: &Path, path: &Path) -> bool {
  let base = normalize_path(base);
  let path = normalize_path(path);
  !path.components().any(|c| c == Component::ParentDir) && path.starts_with(&base)
}

/// True if `path` lies strictly beneath `base`, after normalization.
pub fn is_strictly_within(base: &Path, path: &Path) -> bool {
  is_within(base, path) && normalize_path(base) != normalize_path(path)
}

/// Express `path` relative to `root` as a `/`-separated record line.
///
/// Returns `None` if `path` is not beneath `root`.
pub fn to_record_line(root: &Path, path: &Path) -> Option<String> {
  let relative = normalize_path(path)
    .strip_prefix(normalize_path(root))
    .ok()?
    .to_path_buf();

  let parts: Vec<String> = relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  if parts.is_empty() { None } else { Some(parts.join("/")) }
}

/// Resolve a record line against `root`.
///
/// Both separators are accepted. Returns `None` for absolute lines and for
/// lines that would escape `root`.
pub fn from_record_line(root: &Path, line: &str) -> Option<PathBuf> {
  let relative: PathBuf = line.split(['/', '\\']).filter(|part| !part.is_empty()).collect();
  if line.starts_with(['/', '\\']) || relative.has_root() || relative.is_absolute() {
    return None;
  }

  let path = normalize_path(&root.join(relative));
  is_strictly_within(root, &path).then_some(path)
}
