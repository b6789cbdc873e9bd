//! Local settings for fpm.
//!
//! The settings file is two plain lines:
//!
//! ```text
//! /home/user/Flashpoint
//! https://example.com/repository/stable/components.xml
//! ```
//!
//! The first line is the install root, the second the manifest source. A
//! blank or missing line falls back to the built-in default.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::DEFAULT_SOURCE_URL;
use crate::platform::paths::{config_file, default_install_root};

/// Resolved settings consumed by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  /// Absolute path of the tree components are installed into.
  pub install_root: PathBuf,
  /// URL of the component manifest.
  pub source_url: String,
}

/// Errors that can occur when loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Neither `FPM_CONFIG` nor a home directory is available.
  #[error("cannot determine settings file location (set FPM_CONFIG or HOME)")]
  NoLocation,

  #[error("failed to read settings file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write settings file {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      install_root: default_install_root(),
      source_url: DEFAULT_SOURCE_URL.to_string(),
    }
  }
}

impl Settings {
  /// Parse the two-line settings format, filling gaps with defaults.
  pub fn parse(content: &str) -> Self {
    let mut settings = Self::default();
    let mut lines = content.lines().map(str::trim);

    if let Some(root) = lines.next().filter(|line| !line.is_empty()) {
      settings.install_root = PathBuf::from(root);
    }
    if let Some(source) = lines.next().filter(|line| !line.is_empty()) {
      settings.source_url = source.to_string();
    }

    settings
  }

  /// Render the settings in the on-disk format.
  pub fn render(&self) -> String {
    format!("{}\n{}\n", self.install_root.display(), self.source_url)
  }

  /// Load settings from the default location.
  pub fn load_default() -> Result<(Self, PathBuf), ConfigError> {
    let path = config_file().ok_or(ConfigError::NoLocation)?;
    let settings = Self::load(&path)?;
    Ok((settings, path))
  }

  /// Load settings from `path`.
  ///
  /// A missing file yields the defaults, which are written back on a
  /// best-effort basis so the user has a file to edit.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    match fs::read_to_string(path) {
      Ok(content) => {
        debug!(path = %path.display(), "loaded settings");
        Ok(Self::parse(&content))
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        let settings = Self::default();
        if let Err(e) = settings.save(path) {
          warn!(error = %e, "could not write default settings");
        }
        Ok(settings)
      }
      Err(source) => Err(ConfigError::Read {
        path: path.to_path_buf(),
        source,
      }),
    }
  }

  /// Persist settings to `path`, creating parent directories as needed.
  pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
      path: path.to_path_buf(),
      source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, self.render()).map_err(write_err)?;

    info!(path = %path.display(), "settings saved");
    Ok(())
  }
}
