//! Implementation of the `fpm info` command.

use anyhow::{Result, bail};

use fpm_lib::manifest::Component;

use super::Session;
use crate::output::{OutputFormat, format_bytes, format_timestamp, print_json, print_stat};

fn yes_no(value: bool) -> &'static str {
  if value { "Yes" } else { "No" }
}

pub fn cmd_info(session: &Session, id: &str, output: OutputFormat) -> Result<()> {
  let Some(component) = session.catalog.get(id) else {
    bail!("Specified component does not exist: {}", id);
  };

  if output.is_json() {
    return print_json(component);
  }

  print_details(component);
  Ok(())
}

fn print_details(component: &Component) {
  print_stat("ID", &component.id);
  print_stat("Title", &component.title);
  print_stat("Description", &component.description);
  print_stat("Download size", &format_bytes(component.download_size));
  print_stat("Install size", &format_bytes(component.install_size));
  print_stat("Last updated", &format_timestamp(component.last_updated));
  print_stat("CRC32", &component.hash);

  if !component.dependencies.is_empty() {
    println!();
    println!("Dependencies:");
    for dependency in &component.dependencies {
      println!("  {}", dependency);
    }
  }

  println!();
  print_stat("Required", yes_no(component.is_required()));
  print_stat("Downloaded", yes_no(component.is_installed()));
  if component.is_installed() {
    print_stat("Up-to-date", yes_no(!component.is_stale()));
  }
}
