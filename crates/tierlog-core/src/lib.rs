//! # tierlog core
//!
//! A leveled logging façade that routes records to the console and to a log
//! file, each with its own minimum severity.
//!
//! This crate provides:
//!
//! - **Router**: threshold and sink state, recomputed into per-severity handles
//! - **Handles**: rebindable debug/info/warn/error/critical entry points
//! - **Sinks**: stdout, stderr, append-only files, discard, memory capture, fan-out
//! - **Configuration**: YAML files with environment overrides
//! - **Tracing bridge**: forwards `tracing` events through the router
//!
//! ## Example
//!
//! ```no_run
//! use tierlog_core::{global, Severity};
//!
//! global().set_console_threshold(Severity::Info);
//! global().set_file_sink("/var/log/myapp.log")?;
//!
//! tierlog_core::info!("listening on port {}", 8080);
//! global().error().println("upstream unreachable");
//! # Ok::<(), tierlog_core::TierlogError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod config;
pub mod global;
pub mod handle;
pub mod router;
pub mod sink;
pub mod util;
pub mod writer;

mod macros;

// Re-export commonly used items
pub use global::global;
pub use handle::Handle;
pub use router::{ConsoleStream, Route, Router};
pub use sink::{Destination, Sink};
pub use tierlog_types::{FileSinkConfig, FormatFlags, Result, RouterConfig, Severity, TierlogError};

/// tierlog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
