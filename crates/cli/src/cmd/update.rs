//! Implementation of the `fpm update` command.
//!
//! With IDs, refreshes the named stale components and downloads any of their
//! dependencies that are missing. Without IDs, refreshes everything stale and
//! downloads every required component that is not installed yet.

use std::time::Instant;

use anyhow::Result;

use fpm_lib::execute;
use fpm_lib::plan::plan_update;

use super::{Session, check_report, print_notices, print_progress, print_queue};
use crate::output::{
  format_bytes, format_duration, format_signed_bytes, print_info, print_stat, print_success, symbols,
};
use crate::prompts::confirm;

pub fn cmd_update(session: &Session, ids: &[String], assume_yes: bool) -> Result<()> {
  let plan = plan_update(&session.catalog, ids);
  print_notices(&plan.notices);

  if plan.is_empty() {
    print_info("No components to update");
    return Ok(());
  }

  if !plan.update.is_empty() {
    print_queue(&plan.update, "updated", symbols::MODIFY);
  }
  if !plan.download.is_empty() {
    print_queue(&plan.download, "downloaded", symbols::ADD);
  }
  print_stat("Estimated download size", &format_bytes(plan.download_size()));
  print_stat("Estimated changed size", &format_signed_bytes(plan.changed_size()));
  println!();

  if !confirm("Is this OK?", assume_yes)? {
    print_info("Cancelled");
    return Ok(());
  }

  let start = Instant::now();
  let report = execute::update(&session.installer(), &plan, &mut print_progress);

  println!();
  let mut summary = format!("Successfully updated {} component(s)", report.updated);
  if !plan.download.is_empty() {
    summary.push_str(&format!(" and downloaded {} component(s)", report.downloaded));
  }
  print_success(&summary);
  print_stat("Duration", &format_duration(start.elapsed()));
  check_report(&report)
}
