use std::time::Duration;

pub const APP_NAME: &str = "fpm";

/// Manifest used when no source has been configured.
pub const DEFAULT_SOURCE_URL: &str = "https://nexus-dev.unstable.life/repository/stable/components.xml";

/// Name of the settings file inside the config directory.
pub const CONFIG_FILENAME: &str = "fpm.cfg";

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "FPM_CONFIG";

/// Directory under the install root holding one installation record per component.
pub const RECORDS_DIR: &str = "Components";

/// Every component in this category is mandatory.
pub const REQUIRED_CATEGORY: &str = "core";

/// Separator joining manifest nesting levels into a component ID.
pub const ID_SEPARATOR: char = '-';

/// Applied to every HTTP call.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
