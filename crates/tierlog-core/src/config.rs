//! Configuration loading for the router.
//!
//! Settings are resolved in this priority order:
//! 1. Environment variables
//! 2. Values loaded from a YAML file
//! 3. Default values
//!
//! ## Example
//!
//! ```no_run
//! use tierlog_core::{config, global};
//!
//! let settings = config::load("~/.config/myapp/logging.yml")?;
//! global().apply(&settings)?;
//! # Ok::<(), tierlog_core::TierlogError>(())
//! ```
//!
//! A configuration file may set any subset of the fields:
//!
//! ```yaml
//! console_level: WARN
//! file_level: DEBUG
//! flags: [date, time, shortfile]
//! file:
//!   path: ~/logs/myapp.log
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tierlog_types::{FileSinkConfig, FormatFlags, Result, RouterConfig, Severity, TierlogError};

use crate::util::expand_path;

/// Overrides the console threshold (`DEBUG` .. `CRITICAL`, `OFF`, or 0-5)
pub const ENV_CONSOLE_LEVEL: &str = "TIERLOG_CONSOLE_LEVEL";
/// Overrides the log file threshold
pub const ENV_FILE_LEVEL: &str = "TIERLOG_FILE_LEVEL";
/// Overrides the format flags, comma separated (`date,time,shortfile`)
pub const ENV_FLAGS: &str = "TIERLOG_FLAGS";
/// Overrides the log file: a path, or `temp:<prefix>` for a fresh file in
/// the system temp directory
pub const ENV_FILE: &str = "TIERLOG_FILE";

/// Load configuration from `path` and apply environment overrides.
///
/// A missing file yields the defaults.
pub fn load(path: impl AsRef<Path>) -> Result<RouterConfig> {
    let config = load_file(path)?;
    apply_env(config)
}

/// Load configuration from a YAML file without consulting the environment.
pub fn load_file(path: impl AsRef<Path>) -> Result<RouterConfig> {
    let path = expand_path(path);
    if !path.exists() {
        return Ok(RouterConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    parse(&content)
}

/// Parse YAML configuration text.
pub fn parse(content: &str) -> Result<RouterConfig> {
    if content.trim().is_empty() {
        return Ok(RouterConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Apply overrides from the process environment.
pub fn apply_env(config: RouterConfig) -> Result<RouterConfig> {
    apply_env_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to read variables.
pub fn apply_env_from(
    mut config: RouterConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RouterConfig> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(value) = get(ENV_CONSOLE_LEVEL) {
        config.console_level = parse_env::<Severity>(ENV_CONSOLE_LEVEL, &value)?;
    }
    if let Some(value) = get(ENV_FILE_LEVEL) {
        config.file_level = parse_env::<Severity>(ENV_FILE_LEVEL, &value)?;
    }
    if let Some(value) = get(ENV_FLAGS) {
        config.flags = parse_env::<FormatFlags>(ENV_FLAGS, &value)?;
    }
    if let Some(value) = get(ENV_FILE) {
        config.file = Some(match value.strip_prefix("temp:") {
            Some(prefix) => FileSinkConfig::Temp {
                temp_prefix: prefix.to_string(),
            },
            None => FileSinkConfig::Path {
                path: PathBuf::from(&value),
            },
        });
    }

    Ok(config)
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = TierlogError>,
{
    value
        .parse()
        .map_err(|e| TierlogError::Config(format!("Invalid value for {}: {}", key, e)))
}
