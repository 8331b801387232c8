//! Severity routing between the console and the log file.
//!
//! The [`Router`] owns two thresholds (console and file), the three physical
//! sinks (stdout, stderr, log file) and the format flags. After every change
//! it recomputes, for each severity, whether records go nowhere, to the
//! console, to the file, or to both, and rebinds the severity's [`Handle`].
//!
//! ## Example
//!
//! ```
//! use tierlog_core::{Router, Severity};
//! use tierlog_core::sink::MemorySink;
//!
//! let router = Router::new();
//! let console = MemorySink::new();
//! let file = MemorySink::new();
//! router.set_console_sinks(console.sink(), console.sink());
//! router.set_file_destination(file.sink());
//! router.set_format_flags(Default::default());
//!
//! router.warn().println("disk almost full");
//! router.info().println("cache warmed");
//!
//! assert_eq!(console.contents(), "WARN: disk almost full\n");
//! assert_eq!(file.contents(), "WARN: disk almost full\nINFO: cache warmed\n");
//! ```

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tierlog_types::config::{DEFAULT_CONSOLE_THRESHOLD, DEFAULT_FILE_THRESHOLD};
use tierlog_types::{FileSinkConfig, FormatFlags, Result, RouterConfig, Severity, TierlogError};

use crate::handle::Handle;
use crate::sink::{self, FanOut, FileSink, Sink};
use crate::util::expand_path;
use crate::writer::LineWriter;

/// Console stream a severity writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleStream {
    /// Standard output, for severities below `Error`
    Stdout,
    /// Standard error, for `Error` and `Critical`
    Stderr,
}

impl ConsoleStream {
    /// Console stream used for `severity`.
    pub fn for_severity(severity: Severity) -> Self {
        if severity.uses_stderr() {
            ConsoleStream::Stderr
        } else {
            ConsoleStream::Stdout
        }
    }
}

/// Where records of one severity end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Dropped
    Discard,
    /// Console only
    Console(ConsoleStream),
    /// Log file only
    File,
    /// Console and log file
    Both(ConsoleStream),
}

impl Route {
    /// Routing decision for `severity` under the given thresholds.
    pub fn compute(severity: Severity, console: Severity, file: Severity) -> Self {
        let stream = ConsoleStream::for_severity(severity);
        match (severity >= console, severity >= file) {
            (false, false) => Route::Discard,
            (true, true) => Route::Both(stream),
            (true, false) => Route::Console(stream),
            (false, true) => Route::File,
        }
    }

    /// Whether the console receives records.
    pub fn includes_console(self) -> bool {
        matches!(self, Route::Console(_) | Route::Both(_))
    }

    /// Whether the log file receives records.
    pub fn includes_file(self) -> bool {
        matches!(self, Route::File | Route::Both(_))
    }
}

struct RouterState {
    console_threshold: Severity,
    file_threshold: Severity,
    flags: FormatFlags,
    stdout: Sink,
    stderr: Sink,
    file: Sink,
    file_path: Option<PathBuf>,
}

impl RouterState {
    fn console_sink(&self, severity: Severity) -> Sink {
        match ConsoleStream::for_severity(severity) {
            ConsoleStream::Stdout => self.stdout.clone(),
            ConsoleStream::Stderr => self.stderr.clone(),
        }
    }

    fn destination(&self, severity: Severity) -> Sink {
        match Route::compute(severity, self.console_threshold, self.file_threshold) {
            Route::Discard => sink::discard(),
            Route::Both(_) => Arc::new(FanOut::new(self.console_sink(severity), self.file.clone())),
            Route::Console(_) => self.console_sink(severity),
            Route::File => self.file.clone(),
        }
    }
}

/// Leveled logging router.
///
/// Mutating calls are meant to come from one configuration path, typically
/// at startup; handle writes may happen from any thread at any time.
pub struct Router {
    state: Mutex<RouterState>,
    handles: [Handle; 5],
}

impl Router {
    /// Create a router in the default configuration: console `Warn` on
    /// stdout/stderr, file `Info` with no file, date and time headers.
    pub fn new() -> Self {
        let state = RouterState {
            console_threshold: DEFAULT_CONSOLE_THRESHOLD,
            file_threshold: DEFAULT_FILE_THRESHOLD,
            flags: FormatFlags::STD,
            stdout: sink::stdout(),
            stderr: sink::stderr(),
            file: sink::discard(),
            file_path: None,
        };
        let handles = Severity::LEVELS
            .map(|level| Handle::new(LineWriter::new(level, state.flags, state.destination(level))));
        Self {
            state: Mutex::new(state),
            handles,
        }
    }

    /// Create a router and apply `config` to it.
    pub fn with_config(config: &RouterConfig) -> Result<Self> {
        let router = Self::new();
        router.apply(config)?;
        Ok(router)
    }

    /// Handle for `severity`; `Off` has no handle of its own and maps to
    /// the `Critical` handle.
    pub fn handle(&self, severity: Severity) -> &Handle {
        let index = severity.index().unwrap_or(Severity::Critical as usize);
        &self.handles[index]
    }

    /// Debug handle.
    pub fn debug(&self) -> &Handle {
        self.handle(Severity::Debug)
    }

    /// Info handle.
    pub fn info(&self) -> &Handle {
        self.handle(Severity::Info)
    }

    /// Warn handle.
    pub fn warn(&self) -> &Handle {
        self.handle(Severity::Warn)
    }

    /// Error handle.
    pub fn error(&self) -> &Handle {
        self.handle(Severity::Error)
    }

    /// Critical handle.
    pub fn critical(&self) -> &Handle {
        self.handle(Severity::Critical)
    }

    /// Current console threshold.
    pub fn console_threshold(&self) -> Severity {
        self.state.lock().console_threshold
    }

    /// Current log file threshold.
    pub fn file_threshold(&self) -> Severity {
        self.state.lock().file_threshold
    }

    /// Current format flags.
    pub fn format_flags(&self) -> FormatFlags {
        self.state.lock().flags
    }

    /// Path of the current log file, if one was opened by path.
    pub fn file_path(&self) -> Option<PathBuf> {
        self.state.lock().file_path.clone()
    }

    /// Routing decision for `severity` under the current thresholds.
    pub fn route(&self, severity: Severity) -> Route {
        let state = self.state.lock();
        Route::compute(severity, state.console_threshold, state.file_threshold)
    }

    /// Set the console threshold; `Off` silences the console.
    pub fn set_console_threshold(&self, level: Severity) {
        self.update(|state| state.console_threshold = level);
    }

    /// Set the console threshold from an integer, clamped to `[Debug, Off]`.
    pub fn set_console_threshold_raw(&self, level: i64) {
        self.set_console_threshold(Severity::clamped(level));
    }

    /// Set the log file threshold; `Off` silences the log file.
    pub fn set_file_threshold(&self, level: Severity) {
        self.update(|state| state.file_threshold = level);
    }

    /// Set the log file threshold from an integer, clamped to `[Debug, Off]`.
    pub fn set_file_threshold_raw(&self, level: i64) {
        self.set_file_threshold(Severity::clamped(level));
    }

    /// Set the header format flags.
    pub fn set_format_flags(&self, flags: FormatFlags) {
        self.update(|state| state.flags = flags);
    }

    /// Replace the console streams.
    pub fn set_console_sinks(&self, stdout: Sink, stderr: Sink) {
        self.update(|state| {
            state.stdout = stdout;
            state.stderr = stderr;
        });
    }

    /// Use an arbitrary destination as the log file.
    pub fn set_file_destination(&self, destination: Sink) {
        let name = destination.name();
        let previous = self.replace_file(destination, None);
        close(previous);
        tracing::debug!(target: "tierlog::router", destination = %name, "file sink replaced");
    }

    /// Stop writing to any log file.
    pub fn clear_file_sink(&self) {
        self.set_file_destination(sink::discard());
    }

    /// Log to `path`, appending to it and creating it when absent.
    ///
    /// On failure the error is also written through the `Critical` handle
    /// and the current file sink stays in place.
    pub fn set_file_sink(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = expand_path(path);
        let file = match FileSink::open(&path) {
            Ok(file) => file,
            Err(err) => {
                self.critical()
                    .println(format_args!("Failed to open log file: {} {}", path.display(), err));
                tracing::warn!(target: "tierlog::router", path = %path.display(), error = %err, "cannot open log file");
                return Err(TierlogError::sink_open(path, err));
            }
        };
        self.announce(format_args!("Logging to file {}", path.display()));
        self.install_file(file);
        Ok(())
    }

    /// Log to a new uniquely named file in the system temp directory.
    ///
    /// Returns the path of the created file, which is kept after the
    /// process exits.
    pub fn set_temporary_file_sink(&self, prefix: &str) -> Result<PathBuf> {
        let dir = std::env::temp_dir();
        let created = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(&dir)
            .and_then(|temp| temp.keep().map_err(|e| e.error));
        let (file, path) = match created {
            Ok(kept) => kept,
            Err(err) => {
                self.critical().println(&err);
                tracing::warn!(target: "tierlog::router", dir = %dir.display(), error = %err, "cannot create temporary log file");
                return Err(TierlogError::sink_open(dir.join(prefix), err));
            }
        };
        self.announce(format_args!("Logging to file: {}", path.display()));
        self.install_file(FileSink::from_file(path.clone(), file));
        Ok(path)
    }

    /// Apply a full configuration: thresholds and flags, then the file sink.
    pub fn apply(&self, config: &RouterConfig) -> Result<()> {
        self.update(|state| {
            state.console_threshold = config.console_level;
            state.file_threshold = config.file_level;
            state.flags = config.flags;
        });
        match &config.file {
            Some(FileSinkConfig::Path { path }) => self.set_file_sink(path),
            Some(FileSinkConfig::Temp { temp_prefix }) => {
                self.set_temporary_file_sink(temp_prefix).map(|_| ())
            }
            None => Ok(()),
        }
    }

    /// Rebuild every handle from the current state.
    ///
    /// Mutating calls do this automatically; calling it again without a
    /// change produces handles that behave identically.
    pub fn recompute(&self) {
        self.update(|_| {});
    }

    fn install_file(&self, file: FileSink) {
        let path = file.path().to_path_buf();
        let previous = self.replace_file(Arc::new(file), Some(path.clone()));
        close(previous);
        tracing::debug!(target: "tierlog::router", path = %path.display(), "file sink replaced");
    }

    fn replace_file(&self, destination: Sink, path: Option<PathBuf>) -> Sink {
        let mut previous = None;
        self.update(|state| {
            previous = Some(std::mem::replace(&mut state.file, destination));
            state.file_path = path;
        });
        previous.unwrap_or_else(sink::discard)
    }

    /// Write a confirmation line straight to the stdout sink, bypassing handles.
    fn announce(&self, message: std::fmt::Arguments<'_>) {
        let stdout = self.state.lock().stdout.clone();
        let _ = stdout.write_all(format!("{}\n", message).as_bytes());
    }

    fn update(&self, change: impl FnOnce(&mut RouterState)) {
        let (console, file) = {
            let mut state = self.state.lock();
            change(&mut state);
            for (handle, level) in self.handles.iter().zip(Severity::LEVELS) {
                handle.rebind(LineWriter::new(level, state.flags, state.destination(level)));
            }
            (state.console_threshold, state.file_threshold)
        };
        tracing::trace!(target: "tierlog::router", %console, %file, "handles rebuilt");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Router")
            .field("console_threshold", &state.console_threshold)
            .field("file_threshold", &state.file_threshold)
            .field("flags", &state.flags)
            .field("file", &state.file.name())
            .finish()
    }
}

/// Flush a replaced file sink and drop the router's reference to it. The
/// file closes once in-flight writes holding the old writer finish.
fn close(previous: Sink) {
    if let Err(err) = previous.flush() {
        tracing::debug!(target: "tierlog::router", error = %err, "flushing replaced file sink failed");
    }
}
