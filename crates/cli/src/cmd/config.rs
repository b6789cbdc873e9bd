//! Implementation of the `fpm path` and `fpm source` commands.
//!
//! Both show or persist a single setting and never touch the network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use fpm_lib::config::Settings;

use crate::output::print_success;

pub fn cmd_path(mut settings: Settings, config_path: &Path, value: Option<String>) -> Result<()> {
  let Some(value) = value else {
    println!("{}", settings.install_root.display());
    return Ok(());
  };

  let root = std::path::absolute(PathBuf::from(&value)).with_context(|| format!("Invalid path: {}", value))?;
  settings.install_root = root;
  settings.save(config_path).context("Failed to save settings")?;

  print_success(&format!("Install root set to {}", settings.install_root.display()));
  Ok(())
}

pub fn cmd_source(mut settings: Settings, config_path: &Path, value: Option<String>) -> Result<()> {
  let Some(value) = value else {
    println!("{}", settings.source_url);
    return Ok(());
  };

  settings.source_url = value;
  settings.save(config_path).context("Failed to save settings")?;

  print_success(&format!("Source set to {}", settings.source_url));
  Ok(())
}
