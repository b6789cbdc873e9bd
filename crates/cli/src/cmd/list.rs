//! Implementation of the `fpm list` command.

use anyhow::Result;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use fpm_lib::manifest::Component;

use super::Session;
use crate::output::{OutputFormat, print_info, print_json, symbols};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFilter {
  /// Components that are not installed
  Available,
  /// Installed components
  Downloaded,
  /// Installed components with a newer version available
  Updates,
}

impl ListFilter {
  fn accepts(self, component: &Component) -> bool {
    match self {
      ListFilter::Available => !component.is_installed(),
      ListFilter::Downloaded => component.is_installed(),
      ListFilter::Updates => component.is_stale(),
    }
  }
}

/// One-character install marker: `*` installed, `!` stale, blank otherwise.
fn marker(component: &Component) -> &'static str {
  if component.is_stale() {
    symbols::STALE
  } else if component.is_installed() {
    symbols::INSTALLED
  } else {
    " "
  }
}

pub fn cmd_list(session: &Session, filter: Option<ListFilter>, long: bool, output: OutputFormat) -> Result<()> {
  let components: Vec<&Component> = session
    .catalog
    .iter()
    .filter(|c| filter.is_none_or(|f| f.accepts(c)))
    .collect();

  if output.is_json() {
    return print_json(&components);
  }

  if session.catalog.is_empty() {
    print_info("No components found. Please check your source URL or internet connection.");
    return Ok(());
  }

  for component in components {
    let mark = marker(component);
    let mark = if component.is_stale() {
      mark.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string()
    } else {
      mark.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    };

    if long {
      println!("{} {} ({})", mark, component.id, component.title);
    } else {
      println!("{} {}", mark, component.id);
    }
  }

  Ok(())
}
