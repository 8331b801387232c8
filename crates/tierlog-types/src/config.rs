//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::{FormatFlags, Severity};

/// Default console threshold.
pub const DEFAULT_CONSOLE_THRESHOLD: Severity = Severity::Warn;

/// Default log file threshold.
pub const DEFAULT_FILE_THRESHOLD: Severity = Severity::Info;

/// Router configuration.
///
/// Every field is optional in the serialized form and falls back to the
/// process start defaults: console `WARN`, file `INFO`, date and time
/// headers, no log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Minimum severity written to the console
    pub console_level: Severity,
    /// Minimum severity written to the log file
    pub file_level: Severity,
    /// Header format flags
    pub flags: FormatFlags,
    /// Log file destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileSinkConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            console_level: DEFAULT_CONSOLE_THRESHOLD,
            file_level: DEFAULT_FILE_THRESHOLD,
            flags: FormatFlags::STD,
            file: None,
        }
    }
}

/// Where the log file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSinkConfig {
    /// A fixed path, opened for append
    Path {
        /// Log file path (supports a leading `~`)
        path: PathBuf,
    },
    /// A fresh file in the system temp directory
    Temp {
        /// File name prefix
        temp_prefix: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.console_level, Severity::Warn);
        assert_eq!(config.file_level, Severity::Info);
        assert_eq!(config.flags, FormatFlags::STD);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_partial_yaml() {
        let config: RouterConfig = serde_yaml::from_str("console_level: DEBUG\n").unwrap();
        assert_eq!(config.console_level, Severity::Debug);
        assert_eq!(config.file_level, Severity::Info);
        assert_eq!(config.flags, FormatFlags::STD);
    }

    #[test]
    fn test_file_variants() {
        let config: RouterConfig = serde_yaml::from_str(
            "file_level: ERROR\nflags: []\nfile:\n  path: /var/log/app.log\n",
        )
        .unwrap();
        assert_eq!(config.file_level, Severity::Error);
        assert!(config.flags.is_empty());
        assert_eq!(
            config.file,
            Some(FileSinkConfig::Path {
                path: PathBuf::from("/var/log/app.log")
            })
        );

        let config: RouterConfig =
            serde_yaml::from_str("file:\n  temp_prefix: myapp-\n").unwrap();
        assert_eq!(
            config.file,
            Some(FileSinkConfig::Temp {
                temp_prefix: "myapp-".to_string()
            })
        );
    }
}
