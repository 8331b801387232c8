//! # tierlog types
//!
//! Core types shared by the tierlog crates.
//!
//! This crate provides:
//!
//! - [`Severity`], the ordered log level enumeration with its `Off` sentinel
//! - [`FormatFlags`], the header options applied to every log line
//! - [`RouterConfig`], the serializable router configuration
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use tierlog_types::{FormatFlags, Severity};
//!
//! let level: Severity = "warning".parse().unwrap();
//! assert_eq!(level, Severity::Warn);
//! assert!(Severity::Error > level);
//!
//! let flags: FormatFlags = "date,shortfile".parse().unwrap();
//! assert!(flags.contains(FormatFlags::DATE));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod flags;
pub mod config;

// Re-export common types for convenience
pub use errors::{TierlogError, Result};
pub use enums::Severity;
pub use flags::FormatFlags;
pub use config::{FileSinkConfig, RouterConfig};
