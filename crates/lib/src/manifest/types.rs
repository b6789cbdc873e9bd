//! Catalog types produced by the manifest parser.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::consts::{ID_SEPARATOR, REQUIRED_CATEGORY};

/// Local installation state of a component.
///
/// Computed by [`crate::state::reconcile`], never read from the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InstallState {
  /// No installation record exists.
  #[default]
  NotInstalled,
  /// Installed and the record's hash matches the manifest.
  Current,
  /// Installed, but the record's hash differs from the manifest.
  Stale {
    /// Install size recorded at the last install, used for update deltas.
    previous_install_size: u64,
  },
}

/// A single installable unit from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
  /// Hierarchical ID, e.g. `core-server-gamezip`.
  pub id: String,
  pub title: String,
  pub description: String,
  /// Install directory relative to the install root.
  pub directory: String,
  /// Opaque content hash identifying the archive version.
  pub hash: String,
  /// Archive location.
  pub url: String,
  pub download_size: u64,
  pub install_size: u64,
  /// Unix timestamp of the last manifest change, if the manifest carried a valid one.
  pub last_updated: Option<i64>,
  /// IDs (or category prefixes) this component depends on.
  pub dependencies: Vec<String>,
  #[serde(flatten)]
  pub state: InstallState,
}

impl Component {
  /// Create a component with the given ID and nothing else set.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: String::new(),
      description: String::new(),
      directory: String::new(),
      hash: String::new(),
      url: String::new(),
      download_size: 0,
      install_size: 0,
      last_updated: None,
      dependencies: Vec::new(),
      state: InstallState::NotInstalled,
    }
  }

  pub fn is_installed(&self) -> bool {
    !matches!(self.state, InstallState::NotInstalled)
  }

  pub fn is_stale(&self) -> bool {
    matches!(self.state, InstallState::Stale { .. })
  }

  /// Install size recorded locally, only meaningful for stale components.
  pub fn previous_install_size(&self) -> Option<u64> {
    match self.state {
      InstallState::Stale { previous_install_size } => Some(previous_install_size),
      _ => None,
    }
  }

  /// Members of the `core` category are pulled in by an untargeted update.
  pub fn is_required(&self) -> bool {
    self.matches(REQUIRED_CATEGORY)
  }

  /// Whether this component is addressed by `token`.
  ///
  /// A token matches its exact ID or any ID nested beneath it, so `core-server`
  /// matches `core-server-gamezip` but not `core-serverx`.
  pub fn matches(&self, token: &str) -> bool {
    match self.id.strip_prefix(token) {
      Some(rest) => rest.is_empty() || rest.starts_with(ID_SEPARATOR),
      None => false,
    }
  }
}

/// Flat, ID-addressed view of a manifest.
///
/// Components keep manifest order, which drives listing and "all" expansion.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  repo_url: String,
  components: Vec<Component>,
  index: HashMap<String, usize>,
}

impl Catalog {
  /// Create an empty catalog serving archives from `repo_url`.
  pub fn new(repo_url: impl Into<String>) -> Self {
    Self {
      repo_url: repo_url.into(),
      components: Vec::new(),
      index: HashMap::new(),
    }
  }

  /// Base URL archives are served from.
  pub fn repo_url(&self) -> &str {
    &self.repo_url
  }

  /// Add a component, keeping the first one when an ID repeats.
  ///
  /// Returns `false` if the ID was already present.
  pub fn insert(&mut self, component: Component) -> bool {
    if self.index.contains_key(&component.id) {
      warn!(id = %component.id, "duplicate component id in manifest, keeping the first");
      return false;
    }
    self.index.insert(component.id.clone(), self.components.len());
    self.components.push(component);
    true
  }

  pub fn get(&self, id: &str) -> Option<&Component> {
    self.index.get(id).map(|&i| &self.components[i])
  }

  /// Components in manifest order.
  pub fn iter(&self) -> impl Iterator<Item = &Component> {
    self.components.iter()
  }

  pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Component> {
    self.components.iter_mut()
  }

  pub fn len(&self) -> usize {
    self.components.len()
  }

  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  /// Every component addressed by `token`, in manifest order.
  pub fn find(&self, token: &str) -> Vec<&Component> {
    self.components.iter().filter(|c| c.matches(token)).collect()
  }
}
