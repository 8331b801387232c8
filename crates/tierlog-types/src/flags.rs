//! Line formatting flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;
use crate::errors::{TierlogError, Result};

/// Set of options controlling the header written before each log message.
///
/// Headers are laid out as `date time file: message`, with the severity
/// prefix in front of the header, or directly before the message when
/// [`FormatFlags::MSG_PREFIX`] is set.
///
/// ```
/// use tierlog_types::FormatFlags;
///
/// let flags = FormatFlags::DATE | FormatFlags::MICROSECONDS;
/// assert!(flags.contains(FormatFlags::DATE));
/// assert!(!flags.contains(FormatFlags::UTC));
/// assert_eq!(flags.to_string(), "date,microseconds");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FormatFlags(u32);

impl FormatFlags {
    /// Local date, `2009/01/23`
    pub const DATE: FormatFlags = FormatFlags(1);
    /// Local time, `01:23:23`
    pub const TIME: FormatFlags = FormatFlags(1 << 1);
    /// Microsecond resolution, `01:23:23.123123`; implies `TIME`
    pub const MICROSECONDS: FormatFlags = FormatFlags(1 << 2);
    /// Full source path and line of the call site, `/a/b/c/main.rs:23`
    pub const LONG_FILE: FormatFlags = FormatFlags(1 << 3);
    /// Final path component and line, `main.rs:23`; overrides `LONG_FILE`
    pub const SHORT_FILE: FormatFlags = FormatFlags(1 << 4);
    /// Use UTC rather than the local time zone
    pub const UTC: FormatFlags = FormatFlags(1 << 5);
    /// Move the severity prefix from the start of the line to just before the message
    pub const MSG_PREFIX: FormatFlags = FormatFlags(1 << 6);
    /// Default flags: date and time
    pub const STD: FormatFlags = FormatFlags(Self::DATE.0 | Self::TIME.0);

    const NAMED: [(FormatFlags, &'static str); 7] = [
        (Self::DATE, "date"),
        (Self::TIME, "time"),
        (Self::MICROSECONDS, "microseconds"),
        (Self::LONG_FILE, "longfile"),
        (Self::SHORT_FILE, "shortfile"),
        (Self::UTC, "utc"),
        (Self::MSG_PREFIX, "msgprefix"),
    ];

    /// No header at all.
    pub const fn empty() -> Self {
        FormatFlags(0)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: FormatFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any timestamp component is rendered.
    pub const fn has_timestamp(self) -> bool {
        self.0 & (Self::DATE.0 | Self::TIME.0 | Self::MICROSECONDS.0) != 0
    }

    /// Whether the call site is rendered.
    pub const fn has_location(self) -> bool {
        self.0 & (Self::LONG_FILE.0 | Self::SHORT_FILE.0) != 0
    }

    /// Names of the set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for FormatFlags {
    type Output = FormatFlags;

    fn bitor(self, rhs: FormatFlags) -> FormatFlags {
        FormatFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FormatFlags {
    fn bitor_assign(&mut self, rhs: FormatFlags) {
        self.0 |= rhs.0;
    }
}

impl FromStr for FormatFlags {
    type Err = TierlogError;

    /// Parse a comma separated list of flag names. `std` expands to date and
    /// time; an empty string or `none` yields no flags.
    fn from_str(s: &str) -> Result<Self> {
        let mut flags = FormatFlags::empty();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let part = part.to_lowercase();
            match part.as_str() {
                "none" => {}
                "std" => flags |= FormatFlags::STD,
                name => {
                    let flag = Self::NAMED
                        .iter()
                        .find(|(_, n)| *n == name)
                        .map(|(flag, _)| *flag)
                        .ok_or_else(|| {
                            TierlogError::Validation(format!("Invalid format flag: {}", name))
                        })?;
                    flags |= flag;
                }
            }
        }
        Ok(flags)
    }
}

impl TryFrom<Vec<String>> for FormatFlags {
    type Error = TierlogError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        names.join(",").parse()
    }
}

impl From<FormatFlags> for Vec<String> {
    fn from(flags: FormatFlags) -> Self {
        flags.names().into_iter().map(String::from).collect()
    }
}

impl fmt::Display for FormatFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_is_date_and_time() {
        assert!(FormatFlags::STD.contains(FormatFlags::DATE));
        assert!(FormatFlags::STD.contains(FormatFlags::TIME));
        assert!(!FormatFlags::STD.contains(FormatFlags::UTC));
        assert!(FormatFlags::STD.has_timestamp());
        assert!(!FormatFlags::STD.has_location());
    }

    #[test]
    fn test_parse_list() {
        let flags: FormatFlags = "std, shortfile,UTC".parse().unwrap();
        assert_eq!(
            flags,
            FormatFlags::STD | FormatFlags::SHORT_FILE | FormatFlags::UTC
        );
        assert_eq!(flags.to_string(), "date,time,shortfile,utc");

        assert!("".parse::<FormatFlags>().unwrap().is_empty());
        assert!("none".parse::<FormatFlags>().unwrap().is_empty());
        assert!("date,seconds".parse::<FormatFlags>().is_err());
    }

    #[test]
    fn test_serde_as_names() {
        let flags = FormatFlags::DATE | FormatFlags::MSG_PREFIX;
        let yaml = serde_yaml::to_string(&flags).unwrap();
        assert_eq!(yaml.trim(), "- date\n- msgprefix");

        let back: FormatFlags = serde_yaml::from_str("[time, microseconds]").unwrap();
        assert_eq!(back, FormatFlags::TIME | FormatFlags::MICROSECONDS);

        assert!(serde_yaml::from_str::<FormatFlags>("[fancy]").is_err());
    }
}
