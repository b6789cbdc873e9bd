//! Sequential execution of download, remove and update plans.
//!
//! Components are processed one at a time in queue order. A failing
//! component is reported and the run moves on to the next one.

use serde::Serialize;
use tracing::{info, warn};

use crate::install::{InstallError, InstallOutcome, Installer, RemoveReport};
use crate::manifest::Component;
use crate::plan::UpdatePlan;

/// The kind of work being done on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  Install,
  Remove,
}

/// What a finished step produced.
#[derive(Debug)]
pub enum Detail<'a> {
  Installed(InstallOutcome),
  Removed(&'a RemoveReport),
}

/// Progress events handed to the caller's observer.
#[derive(Debug)]
pub enum Progress<'a> {
  Started {
    step: Step,
    component: &'a Component,
  },
  Finished {
    component: &'a Component,
    detail: Detail<'a>,
  },
  Failed {
    step: Step,
    component: &'a Component,
    error: &'a InstallError,
  },
}

/// Counts for a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
  pub succeeded: usize,
  pub failed: usize,
  /// Stale components reinstalled by an update.
  pub updated: usize,
  /// Components installed for the first time.
  pub downloaded: usize,
  /// Removals that left files behind or refused record lines.
  pub warnings: usize,
}

impl ExecutionReport {
  pub fn is_success(&self) -> bool {
    self.failed == 0
  }
}

/// Install `component`, returning whether it succeeded.
fn install_one(
  installer: &Installer<'_>,
  component: &Component,
  observer: &mut dyn FnMut(Progress<'_>),
  report: &mut ExecutionReport,
) -> bool {
  observer(Progress::Started {
    step: Step::Install,
    component,
  });

  match installer.install(component) {
    Ok(outcome) => {
      report.succeeded += 1;
      observer(Progress::Finished {
        component,
        detail: Detail::Installed(outcome),
      });
      true
    }
    Err(error) => {
      warn!(id = %component.id, error = %error, "install failed");
      report.failed += 1;
      observer(Progress::Failed {
        step: Step::Install,
        component,
        error: &error,
      });
      false
    }
  }
}

/// Remove `component`, returning whether it came out clean.
fn remove_one(installer: &Installer<'_>, component: &Component, observer: &mut dyn FnMut(Progress<'_>)) -> bool {
  observer(Progress::Started {
    step: Step::Remove,
    component,
  });
  let removal = installer.remove(component);
  observer(Progress::Finished {
    component,
    detail: Detail::Removed(&removal),
  });
  removal.is_clean()
}

/// Install every component in `queue`.
pub fn download(
  installer: &Installer<'_>,
  queue: &[&Component],
  observer: &mut dyn FnMut(Progress<'_>),
) -> ExecutionReport {
  let mut report = ExecutionReport::default();
  for component in queue {
    if install_one(installer, component, observer, &mut report) {
      report.downloaded += 1;
    }
  }

  info!(succeeded = report.succeeded, failed = report.failed, "download finished");
  report
}

/// Remove every component in `queue`.
pub fn remove(
  installer: &Installer<'_>,
  queue: &[&Component],
  observer: &mut dyn FnMut(Progress<'_>),
) -> ExecutionReport {
  let mut report = ExecutionReport::default();
  for component in queue {
    if !remove_one(installer, component, observer) {
      report.warnings += 1;
    }
    report.succeeded += 1;
  }

  info!(removed = report.succeeded, warnings = report.warnings, "removal finished");
  report
}

/// Reinstall stale components, then install missing dependencies.
pub fn update(
  installer: &Installer<'_>,
  plan: &UpdatePlan<'_>,
  observer: &mut dyn FnMut(Progress<'_>),
) -> ExecutionReport {
  let mut report = ExecutionReport::default();

  for component in &plan.update {
    if !remove_one(installer, component, observer) {
      report.warnings += 1;
    }
    if install_one(installer, component, observer, &mut report) {
      report.updated += 1;
    }
  }
  for component in &plan.download {
    if install_one(installer, component, observer, &mut report) {
      report.downloaded += 1;
    }
  }

  info!(
    updated = report.updated,
    downloaded = report.downloaded,
    failed = report.failed,
    warnings = report.warnings,
    "update finished"
  );
  report
}
