//! Implementation of the `fpm download` command.

use std::time::Instant;

use anyhow::Result;

use fpm_lib::execute;
use fpm_lib::plan::plan_download;

use super::{Session, check_report, print_notices, print_progress, print_queue};
use crate::output::{format_bytes, format_duration, print_info, print_stat, print_success, symbols};
use crate::prompts::confirm;

pub fn cmd_download(session: &Session, ids: &[String], assume_yes: bool) -> Result<()> {
  let plan = plan_download(&session.catalog, ids);
  print_notices(&plan.notices);

  if plan.is_empty() {
    print_info("No components to download");
    return Ok(());
  }

  print_queue(&plan.queue, "downloaded", symbols::ADD);
  print_stat("Estimated download size", &format_bytes(plan.download_size()));
  print_stat("Estimated install size", &format_bytes(plan.install_size()));
  println!();

  if !confirm("Is this OK?", assume_yes)? {
    print_info("Cancelled");
    return Ok(());
  }

  let start = Instant::now();
  let report = execute::download(&session.installer(), &plan.queue, &mut print_progress);

  println!();
  print_success(&format!("Successfully downloaded {} component(s)", report.downloaded));
  print_stat("Duration", &format_duration(start.elapsed()));
  check_report(&report)
}
