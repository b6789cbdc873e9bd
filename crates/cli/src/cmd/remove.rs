//! Implementation of the `fpm remove` command.
//!
//! Only the named components are removed; dependencies stay installed.

use anyhow::Result;

use fpm_lib::execute;
use fpm_lib::plan::plan_remove;

use super::{Session, check_report, print_notices, print_progress, print_queue};
use crate::output::{format_bytes, print_info, print_stat, print_success, symbols};
use crate::prompts::confirm;

pub fn cmd_remove(session: &Session, ids: &[String], assume_yes: bool) -> Result<()> {
  let plan = plan_remove(&session.catalog, ids);
  print_notices(&plan.notices);

  if plan.is_empty() {
    print_info("No components to remove");
    return Ok(());
  }

  print_queue(&plan.queue, "removed", symbols::REMOVE);
  print_stat("Estimated freed size", &format_bytes(plan.freed_size()));
  println!();

  if !confirm("Is this OK?", assume_yes)? {
    print_info("Cancelled");
    return Ok(());
  }

  let report = execute::remove(&session.installer(), &plan.queue, &mut print_progress);

  println!();
  print_success(&format!("Successfully removed {} component(s)", report.succeeded));
  check_report(&report)
}
