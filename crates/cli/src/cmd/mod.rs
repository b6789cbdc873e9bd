mod config;
mod download;
mod info;
mod list;
mod remove;
mod update;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use fpm_lib::config::Settings;
use fpm_lib::execute::{Detail, ExecutionReport, Progress, Step};
use fpm_lib::fetch::HttpFetcher;
use fpm_lib::install::{InstallOutcome, Installer};
use fpm_lib::manifest::{self, Catalog, Component};
use fpm_lib::plan::Notice;

use crate::output::{print_error, print_warning};

pub use config::{cmd_path, cmd_source};
pub use download::cmd_download;
pub use info::cmd_info;
pub use list::{ListFilter, cmd_list};
pub use remove::cmd_remove;
pub use update::cmd_update;

/// Everything a catalog command needs: the loaded catalog and a way to fetch archives.
pub struct Session {
  pub catalog: Catalog,
  fetcher: HttpFetcher,
  install_root: PathBuf,
}

impl Session {
  /// Fetch the manifest and reconcile it with the install root.
  pub fn open(settings: &Settings) -> Result<Self> {
    debug!(
      root = %settings.install_root.display(),
      source = %settings.source_url,
      "opening catalog"
    );
    let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
    let catalog = manifest::load(&fetcher, &settings.source_url, &settings.install_root)
      .with_context(|| format!("Error fetching components from {}", settings.source_url))?;

    Ok(Self {
      catalog,
      fetcher,
      install_root: settings.install_root.clone(),
    })
  }

  pub fn installer(&self) -> Installer<'_> {
    Installer::new(&self.install_root, &self.fetcher)
  }
}

fn print_notices(notices: &[Notice]) {
  for notice in notices {
    print_warning(&notice.to_string());
  }
}

/// Print a queue under a heading like `2 component(s) will be removed:`.
fn print_queue(components: &[&Component], action: &str, symbol: &str) {
  println!("{} component(s) will be {}:", components.len(), action);
  for component in components {
    println!(
      "  {} {}",
      symbol.if_supports_color(Stream::Stdout, |s| s.bold()),
      component.id
    );
  }
  println!();
}

/// Per-component progress lines for plan execution.
fn print_progress(progress: Progress<'_>) {
  match progress {
    Progress::Started { step, component } => {
      let verb = match step {
        Step::Install => "Downloading",
        Step::Remove => "Removing",
      };
      print!("  {} {}... ", verb, component.id);
      let _ = io::stdout().flush();
    }
    Progress::Finished { detail, .. } => match detail {
      Detail::Installed(InstallOutcome::Skipped) => println!("nothing to install"),
      Detail::Installed(InstallOutcome::Installed { files }) => {
        println!("{} ({} files)", "done".if_supports_color(Stream::Stdout, |s| s.green()), files)
      }
      Detail::Removed(report) => {
        println!("{}", "done".if_supports_color(Stream::Stdout, |s| s.green()));
        for line in &report.refused {
          print_warning(&format!("Refused to delete {} (outside the install root)", line));
        }
        for failure in &report.failures {
          print_warning(&failure.to_string());
        }
      }
    },
    Progress::Failed { step, component, error } => {
      println!("{}", "failed".if_supports_color(Stream::Stdout, |s| s.red()));
      let verb = match step {
        Step::Install => "download",
        Step::Remove => "remove",
      };
      print_error(&format!("Failed to {} {}: {}", verb, component.id, error));
    }
  }
}

/// Fail the command when any component failed, after the summary was printed.
fn check_report(report: &ExecutionReport) -> Result<()> {
  if report.warnings > 0 {
    print_warning(&format!(
      "{} component(s) could not be removed cleanly",
      report.warnings
    ));
  }
  if !report.is_success() {
    bail!("{} component(s) failed", report.failed);
  }
  Ok(())
}
