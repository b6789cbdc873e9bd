//! Queue planning for the download, remove and update operations.
//!
//! Each planner turns the user's tokens into work queues plus a list of
//! [`Notice`]s for targets that were skipped. Notices are informational; a
//! plan with notices is still executed.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::manifest::{Catalog, Component};
use crate::resolve::resolve;

/// Why a requested target was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Notice {
  /// The token matched no component or category.
  UnknownTarget(String),
  /// An explicitly requested component is not installed.
  NotInstalled(String),
  /// An explicitly requested component is already up to date.
  AlreadyCurrent(String),
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Notice::UnknownTarget(token) => {
        write!(f, "Component or category {} does not exist and will be skipped", token)
      }
      Notice::NotInstalled(id) => write!(f, "Component {} is not downloaded and will be skipped", id),
      Notice::AlreadyCurrent(id) => write!(f, "Component {} is already up-to-date and will be skipped", id),
    }
  }
}

/// Where a component entered the update recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  /// Named by the user (directly or through a category token).
  Explicit,
  /// Reached through another component's dependencies.
  Dependency,
}

/// Keep the first occurrence of each component.
fn dedup(queue: &mut Vec<&Component>) {
  let mut seen = HashSet::new();
  queue.retain(|c| seen.insert(c.id.clone()));
}

/// Sum sizes from the manifest, saturating instead of overflowing.
fn total<I: IntoIterator<Item = u64>>(sizes: I) -> u64 {
  sizes.into_iter().fold(0, u64::saturating_add)
}

/// Components to install.
#[derive(Debug, Default)]
pub struct DownloadPlan<'a> {
  pub queue: Vec<&'a Component>,
  pub notices: Vec<Notice>,
}

impl DownloadPlan<'_> {
  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  pub fn download_size(&self) -> u64 {
    total(self.queue.iter().map(|c| c.download_size))
  }

  pub fn install_size(&self) -> u64 {
    total(self.queue.iter().map(|c| c.install_size))
  }
}

/// Plan the download of `tokens` and everything they depend on.
///
/// With no tokens every component is a target. Installed components are
/// silently left out.
pub fn plan_download<'a, S: AsRef<str>>(catalog: &'a Catalog, tokens: &[S]) -> DownloadPlan<'a> {
  let resolution = resolve(catalog, tokens, |c| !c.is_installed());
  let plan = DownloadPlan {
    queue: resolution.queue,
    notices: resolution.unmatched.into_iter().map(Notice::UnknownTarget).collect(),
  };
  debug!(queued = plan.queue.len(), notices = plan.notices.len(), "download planned");
  plan
}

/// Components to uninstall.
#[derive(Debug, Default)]
pub struct RemovePlan<'a> {
  pub queue: Vec<&'a Component>,
  pub notices: Vec<Notice>,
}

impl RemovePlan<'_> {
  pub fn is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  /// Space expected to be freed.
  pub fn freed_size(&self) -> u64 {
    total(self.queue.iter().map(|c| c.install_size))
  }
}

/// Plan the removal of exactly the components named by `tokens`.
///
/// Removal never follows dependencies and an empty token list removes nothing.
pub fn plan_remove<'a, S: AsRef<str>>(catalog: &'a Catalog, tokens: &[S]) -> RemovePlan<'a> {
  let mut plan = RemovePlan::default();

  for token in tokens {
    let token = token.as_ref();
    let matches = catalog.find(token);
    if matches.is_empty() {
      plan.notices.push(Notice::UnknownTarget(token.to_string()));
      continue;
    }

    for component in matches {
      if component.is_installed() {
        plan.queue.push(component);
      } else {
        plan.notices.push(Notice::NotInstalled(component.id.clone()));
      }
    }
  }

  dedup(&mut plan.queue);
  debug!(queued = plan.queue.len(), notices = plan.notices.len(), "removal planned");
  plan
}

/// Components to refresh and missing dependencies to fetch.
#[derive(Debug, Default)]
pub struct UpdatePlan<'a> {
  /// Installed, stale components to reinstall.
  pub update: Vec<&'a Component>,
  /// Components that are not installed yet.
  pub download: Vec<&'a Component>,
  pub notices: Vec<Notice>,
}

impl UpdatePlan<'_> {
  pub fn is_empty(&self) -> bool {
    self.update.is_empty() && self.download.is_empty()
  }

  pub fn download_size(&self) -> u64 {
    total(self.update.iter().chain(&self.download).map(|c| c.download_size))
  }

  /// Net change in installed size; negative when updates shrink.
  ///
  /// Clamped to the `i64` range.
  pub fn changed_size(&self) -> i64 {
    let updates = self
      .update
      .iter()
      .map(|c| i128::from(c.install_size) - i128::from(c.previous_install_size().unwrap_or(0)));
    let downloads = self.download.iter().map(|c| i128::from(c.install_size));
    let delta = updates.chain(downloads).fold(0i128, i128::saturating_add);
    i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX })
  }
}

struct UpdatePlanner<'a> {
  catalog: &'a Catalog,
  visited: HashSet<&'a str>,
  plan: UpdatePlan<'a>,
}

impl<'a> UpdatePlanner<'a> {
  fn visit(&mut self, token: &str, origin: Origin) {
    let matches = self.catalog.find(token);
    if matches.is_empty() {
      if origin == Origin::Explicit {
        self.plan.notices.push(Notice::UnknownTarget(token.to_string()));
      }
      return;
    }

    for component in matches {
      if !self.visited.insert(component.id.as_str()) {
        continue;
      }

      match (component.is_installed(), component.is_stale(), origin) {
        (false, _, Origin::Dependency) => self.plan.download.push(component),
        (false, _, Origin::Explicit) => self.plan.notices.push(Notice::NotInstalled(component.id.clone())),
        (true, false, Origin::Explicit) => self.plan.notices.push(Notice::AlreadyCurrent(component.id.clone())),
        (true, false, Origin::Dependency) => {}
        (true, true, _) => {
          self.plan.update.push(component);
          for dependency in &component.dependencies {
            self.visit(dependency, Origin::Dependency);
          }
        }
      }
    }
  }
}

/// Plan an update.
///
/// With tokens, each matched stale component is updated and its missing
/// dependencies are downloaded. Without tokens, every stale component is
/// updated and every required component that is missing is downloaded.
pub fn plan_update<'a, S: AsRef<str>>(catalog: &'a Catalog, tokens: &[S]) -> UpdatePlan<'a> {
  let mut plan = if tokens.is_empty() {
    UpdatePlan {
      update: catalog.iter().filter(|c| c.is_stale()).collect(),
      download: catalog.iter().filter(|c| c.is_required() && !c.is_installed()).collect(),
      notices: Vec::new(),
    }
  } else {
    let mut planner = UpdatePlanner {
      catalog,
      visited: HashSet::new(),
      plan: UpdatePlan::default(),
    };
    for token in tokens {
      planner.visit(token.as_ref(), Origin::Explicit);
    }
    planner.plan
  };

  dedup(&mut plan.update);
  dedup(&mut plan.download);
  debug!(
    update = plan.update.len(),
    download = plan.download.len(),
    notices = plan.notices.len(),
    "update planned"
  );
  plan
}
