use crate::consts::{APP_NAME, CONFIG_ENV, CONFIG_FILENAME};
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> Option<PathBuf> {
  let config_home = std::env::var_os("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".config")))?;
  Some(config_home.join(APP_NAME))
}

/// Location of the settings file.
///
/// `FPM_CONFIG` wins when set, otherwise `<config_dir>/fpm.cfg`.
pub fn config_file() -> Option<PathBuf> {
  if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
    return Some(PathBuf::from(explicit));
  }
  config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Default install root: the parent of the directory holding the running binary.
///
/// Components are usually shipped next to a launcher layout like
/// `<root>/Manager/fpm`, so the binary's grandparent is the tree to manage.
pub fn default_install_root() -> PathBuf {
  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().and_then(|dir| dir.parent()).map(PathBuf::from))
    .unwrap_or_else(|| PathBuf::from("."))
}
