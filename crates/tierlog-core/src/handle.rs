//! Per-severity logging handles.

use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;
use tierlog_types::Severity;

use crate::writer::LineWriter;

/// Entry point for writing records at one severity.
///
/// A handle is a shared slot holding the current [`LineWriter`]. The router
/// swaps the slot contents whenever its configuration changes, and every
/// clone of the handle observes the new writer on its next write.
///
/// Write errors are swallowed by [`Handle::println`] and
/// [`Handle::write_fmt`]; use [`Handle::try_println`] to observe them.
#[derive(Clone)]
pub struct Handle {
    severity: Severity,
    slot: Arc<RwLock<Arc<LineWriter>>>,
}

impl Handle {
    pub(crate) fn new(writer: LineWriter) -> Self {
        Self {
            severity: writer.severity(),
            slot: Arc::new(RwLock::new(Arc::new(writer))),
        }
    }

    /// Severity this handle writes at.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Whether anything written through this handle reaches a sink.
    pub fn enabled(&self) -> bool {
        !self.current().is_discard()
    }

    /// Name of the destination currently bound, e.g. `stderr+/var/log/app.log`.
    pub fn destination_name(&self) -> String {
        self.current().destination().name()
    }

    /// Write one line.
    #[track_caller]
    pub fn println(&self, message: impl fmt::Display) {
        let _ = self.try_println(message);
    }

    /// Write one line from pre-built format arguments.
    #[track_caller]
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) {
        let _ = self.try_write_fmt(args);
    }

    /// Write one line, reporting I/O failures.
    #[track_caller]
    pub fn try_println(&self, message: impl fmt::Display) -> io::Result<()> {
        self.try_write_fmt(format_args!("{}", message))
    }

    /// Write one line from format arguments, reporting I/O failures.
    #[track_caller]
    pub fn try_write_fmt(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let location = Location::caller();
        let writer = self.current();
        if writer.is_discard() {
            return Ok(());
        }
        match args.as_str() {
            Some(message) => writer.write_line(message, location),
            None => writer.write_line(&args.to_string(), location),
        }
    }

    /// Write one line attributed to an explicit source file and line.
    pub fn println_at(&self, message: impl fmt::Display, file: &str, line: u32) {
        let writer = self.current();
        if writer.is_discard() {
            return;
        }
        let _ = writer.write_line_at(&message.to_string(), file, line);
    }

    /// Flush the bound destination.
    pub fn flush(&self) -> io::Result<()> {
        self.current().destination().flush()
    }

    pub(crate) fn rebind(&self, writer: LineWriter) {
        *self.slot.write() = Arc::new(writer);
    }

    fn current(&self) -> Arc<LineWriter> {
        self.slot.read().clone()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("severity", &self.severity)
            .field("writer", &*self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{discard, MemorySink};
    use tierlog_types::FormatFlags;

    #[test]
    fn test_clone_observes_rebind() {
        let first = MemorySink::new();
        let second = MemorySink::new();
        let handle = Handle::new(LineWriter::new(
            Severity::Info,
            FormatFlags::empty(),
            first.sink(),
        ));
        let held = handle.clone();

        held.println("one");
        handle.rebind(LineWriter::new(
            Severity::Info,
            FormatFlags::empty(),
            second.sink(),
        ));
        held.println("two");

        assert_eq!(first.contents(), "INFO: one\n");
        assert_eq!(second.contents(), "INFO: two\n");
    }

    #[test]
    fn test_formatted_write() {
        let memory = MemorySink::new();
        let handle = Handle::new(LineWriter::new(
            Severity::Debug,
            FormatFlags::empty(),
            memory.sink(),
        ));
        handle.write_fmt(format_args!("{} of {}", 3, 7));
        handle.println(42);
        assert_eq!(memory.contents(), "DEBUG: 3 of 7\nDEBUG: 42\n");
    }

    #[test]
    fn test_println_at_uses_given_site() {
        let memory = MemorySink::new();
        let handle = Handle::new(LineWriter::new(
            Severity::Warn,
            FormatFlags::LONG_FILE,
            memory.sink(),
        ));
        handle.println_at("replayed", "vendor/lib/src/pool.rs", 12);
        assert_eq!(memory.contents(), "WARN: vendor/lib/src/pool.rs:12: replayed\n");
    }

    #[test]
    fn test_enabled() {
        let handle = Handle::new(LineWriter::new(Severity::Warn, FormatFlags::STD, discard()));
        assert!(!handle.enabled());
        assert!(handle.try_println("dropped").is_ok());

        handle.rebind(LineWriter::new(
            Severity::Warn,
            FormatFlags::STD,
            MemorySink::new().sink(),
        ));
        assert!(handle.enabled());
        assert_eq!(handle.destination_name(), "memory");
    }
}
