//! Rendering of prefixed, timestamped log lines.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use std::io;
use std::panic::Location;
use tierlog_types::{FormatFlags, Severity};

use crate::sink::Sink;

/// A severity prefix and format flags bound to one destination.
///
/// Writers are immutable; the router builds a fresh one whenever the
/// thresholds, sinks or flags change.
#[derive(Clone)]
pub struct LineWriter {
    severity: Severity,
    flags: FormatFlags,
    destination: Sink,
}

impl LineWriter {
    /// Create a writer for `severity` over `destination`.
    pub fn new(severity: Severity, flags: FormatFlags, destination: Sink) -> Self {
        Self {
            severity,
            flags,
            destination,
        }
    }

    /// Severity whose prefix this writer emits.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Flags used when rendering.
    pub fn flags(&self) -> FormatFlags {
        self.flags
    }

    /// The bound destination.
    pub fn destination(&self) -> &Sink {
        &self.destination
    }

    /// Whether lines written here are dropped.
    pub fn is_discard(&self) -> bool {
        self.destination.is_discard()
    }

    /// Render and write one line in a single write.
    pub fn write_line(&self, message: &str, location: &Location<'_>) -> io::Result<()> {
        self.write_line_at(message, location.file(), location.line())
    }

    /// Like [`LineWriter::write_line`], with the call site given explicitly.
    pub fn write_line_at(&self, message: &str, file: &str, line: u32) -> io::Result<()> {
        if self.is_discard() {
            return Ok(());
        }
        let rendered = self.render(message, file, line);
        self.destination.write_all(rendered.as_bytes())
    }

    /// Render one line using the current clock.
    pub fn render(&self, message: &str, file: &str, line: u32) -> String {
        if self.flags.contains(FormatFlags::UTC) {
            self.render_at(&Utc::now(), message, file, line)
        } else {
            self.render_at(&Local::now(), message, file, line)
        }
    }

    /// Render one line with an explicit timestamp.
    pub fn render_at<Tz>(
        &self,
        now: &DateTime<Tz>,
        message: &str,
        file: &str,
        line_no: u32,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let flags = self.flags;
        let prefix = self.severity.prefix();
        let mut line = String::with_capacity(prefix.len() + message.len() + 32);

        if !flags.contains(FormatFlags::MSG_PREFIX) {
            line.push_str(prefix);
        }
        if flags.contains(FormatFlags::DATE) {
            line.push_str(&now.format("%Y/%m/%d ").to_string());
        }
        if flags.contains(FormatFlags::TIME) || flags.contains(FormatFlags::MICROSECONDS) {
            line.push_str(&now.format("%H:%M:%S").to_string());
            if flags.contains(FormatFlags::MICROSECONDS) {
                line.push_str(&now.format("%.6f").to_string());
            }
            line.push(' ');
        }
        if flags.has_location() {
            let file = if flags.contains(FormatFlags::SHORT_FILE) {
                short_file(file)
            } else {
                file
            };
            line.push_str(&format!("{}:{}: ", file, line_no));
        }
        if flags.contains(FormatFlags::MSG_PREFIX) {
            line.push_str(prefix);
        }
        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

impl fmt::Debug for LineWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineWriter")
            .field("severity", &self.severity)
            .field("flags", &self.flags)
            .field("destination", &self.destination.name())
            .finish()
    }
}

fn short_file(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{discard, MemorySink};
    use chrono::NaiveDate;

    fn fixed_time() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2009, 1, 23)
            .unwrap()
            .and_hms_micro_opt(1, 23, 23, 123123)
            .unwrap()
            .and_utc()
    }

    fn render(flags: FormatFlags, message: &str) -> String {
        let writer = LineWriter::new(Severity::Info, flags, discard());
        writer.render_at(&fixed_time(), message, "src/main.rs", 1)
    }

    #[test]
    fn test_no_flags() {
        assert_eq!(render(FormatFlags::empty(), "hello"), "INFO: hello\n");
    }

    #[test]
    fn test_single_terminator() {
        assert_eq!(render(FormatFlags::empty(), "hello\n"), "INFO: hello\n");
        assert_eq!(render(FormatFlags::empty(), ""), "INFO: \n");
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(
            render(FormatFlags::STD, "hello"),
            "INFO: 2009/01/23 01:23:23 hello\n"
        );
        assert_eq!(
            render(FormatFlags::DATE, "hello"),
            "INFO: 2009/01/23 hello\n"
        );
        assert_eq!(
            render(FormatFlags::MICROSECONDS, "hello"),
            "INFO: 01:23:23.123123 hello\n"
        );
    }

    #[test]
    fn test_msg_prefix() {
        assert_eq!(
            render(FormatFlags::TIME | FormatFlags::MSG_PREFIX, "hello"),
            "01:23:23 INFO: hello\n"
        );
    }

    #[test]
    fn test_location() {
        let location = Location::caller();
        let writer = LineWriter::new(Severity::Warn, FormatFlags::SHORT_FILE, discard());
        let line = writer.render_at(&fixed_time(), "m", location.file(), location.line());
        assert_eq!(line, format!("WARN: writer.rs:{}: m\n", location.line()));

        let writer = LineWriter::new(
            Severity::Warn,
            FormatFlags::LONG_FILE | FormatFlags::SHORT_FILE,
            discard(),
        );
        let line = writer.render_at(&fixed_time(), "m", location.file(), location.line());
        assert!(line.starts_with("WARN: writer.rs:"));

        let writer = LineWriter::new(Severity::Warn, FormatFlags::LONG_FILE, discard());
        let line = writer.render_at(&fixed_time(), "m", location.file(), location.line());
        assert_eq!(
            line,
            format!("WARN: {}:{}: m\n", location.file(), location.line())
        );
    }

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("crates/tierlog-core/src/router.rs"), "router.rs");
        assert_eq!(short_file("src\\main.rs"), "main.rs");
        assert_eq!(short_file("lib.rs"), "lib.rs");
    }

    #[test]
    fn test_write_line_at_explicit_site() {
        let memory = MemorySink::new();
        let writer = LineWriter::new(Severity::Info, FormatFlags::SHORT_FILE, memory.sink());
        writer.write_line_at("m", "src/cache/store.rs", 88).unwrap();
        assert_eq!(memory.contents(), "INFO: store.rs:88: m\n");
    }

    #[test]
    fn test_write_line_single_write() {
        let memory = MemorySink::new();
        let writer = LineWriter::new(Severity::Error, FormatFlags::empty(), memory.sink());
        writer.write_line("m", Location::caller()).unwrap();
        assert_eq!(memory.contents(), "ERROR: m\n");
    }
}
