//! Common enumerations used throughout tierlog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{TierlogError, Result};

/// Log severity, ordered from `Debug` (lowest) to `Off`.
///
/// `Off` is a sentinel: no record is ever emitted at `Off`, so using it as a
/// threshold disables the sink entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Severity {
    /// Debug messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warnings
    Warn = 2,
    /// Errors
    Error = 3,
    /// Critical failures
    Critical = 4,
    /// Matches no level
    Off = 5,
}

impl Severity {
    /// The five levels records can be written at, in ascending order.
    pub const LEVELS: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Critical,
    ];

    /// Convert an integer into a severity, clamping to `[Debug, Off]`.
    ///
    /// ```
    /// use tierlog_types::Severity;
    ///
    /// assert_eq!(Severity::clamped(-4), Severity::Debug);
    /// assert_eq!(Severity::clamped(2), Severity::Warn);
    /// assert_eq!(Severity::clamped(99), Severity::Off);
    /// ```
    pub fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            4 => Severity::Critical,
            _ => Severity::Off,
        }
    }

    /// Integer value of this severity.
    pub fn as_i64(self) -> i64 {
        self as u8 as i64
    }

    /// Line prefix written by the handle for this severity.
    pub fn prefix(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG: ",
            Severity::Info => "INFO: ",
            Severity::Warn => "WARN: ",
            Severity::Error => "ERROR: ",
            Severity::Critical => "CRITICAL: ",
            Severity::Off => "",
        }
    }

    /// Whether console output at this severity goes to stderr rather than stdout.
    pub fn uses_stderr(self) -> bool {
        self >= Severity::Error
    }

    /// Position of this level in [`Severity::LEVELS`], `None` for `Off`.
    pub fn index(self) -> Option<usize> {
        match self {
            Severity::Off => None,
            level => Some(level as usize),
        }
    }
}

impl From<Severity> for i64 {
    fn from(level: Severity) -> Self {
        level.as_i64()
    }
}

impl FromStr for Severity {
    type Err = TierlogError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Ok(Severity::clamped(value));
        }
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            "OFF" | "NONE" => Ok(Severity::Off),
            _ => Err(TierlogError::Validation(format!("Invalid severity: {}", s))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "DEBUG"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warn => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Off => write!(f, "OFF"),
        }
    }
}
