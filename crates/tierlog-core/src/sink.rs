//! Output destinations.
//!
//! A [`Destination`] receives fully rendered log lines. Every implementation
//! serializes its own writes, so a line handed to [`Destination::write_all`]
//! never interleaves with a line written concurrently by another handle.

use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A writable destination for rendered log lines.
pub trait Destination: Send + Sync {
    /// Write the whole buffer as a single unit.
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered output.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Human readable name, used in diagnostics.
    fn name(&self) -> String;

    /// Whether writes are thrown away.
    ///
    /// Handles bound to a discarding destination skip rendering entirely.
    fn is_discard(&self) -> bool {
        false
    }
}

/// Shared reference to a destination.
pub type Sink = Arc<dyn Destination>;

/// Process standard output.
pub fn stdout() -> Sink {
    Arc::new(Stdout)
}

/// Process standard error.
pub fn stderr() -> Sink {
    Arc::new(Stderr)
}

/// A sink that drops everything.
pub fn discard() -> Sink {
    Arc::new(Discard)
}

/// Process standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Destination for Stdout {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(buf)?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }

    fn name(&self) -> String {
        "stdout".to_string()
    }
}

/// Process standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Destination for Stderr {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn name(&self) -> String {
        "stderr".to_string()
    }
}

/// Drops every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl Destination for Discard {
    fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> String {
        "discard".to_string()
    }

    fn is_discard(&self) -> bool {
        true
    }
}

/// An append-only log file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it when absent.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        let file = options.open(path)?;
        Ok(Self::from_file(path, file))
    }

    /// Wrap an already opened file.
    pub fn from_file(path: impl Into<PathBuf>, file: File) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(file),
        }
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.file.lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.file.lock().flush()
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory buffer, handy for capturing output.
///
/// Clones share the same buffer.
///
/// ```
/// use tierlog_core::sink::{Destination, MemorySink};
///
/// let sink = MemorySink::new();
/// sink.write_all(b"INFO: ready\n").unwrap();
/// assert_eq!(sink.contents(), "INFO: ready\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Written bytes as text, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }

    /// Shareable sink writing into this buffer.
    pub fn sink(&self) -> Sink {
        Arc::new(self.clone())
    }
}

impl Destination for MemorySink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

/// Duplicates every write to a console sink and a file sink.
///
/// Both writes are always attempted; the first error is returned.
pub struct FanOut {
    console: Sink,
    file: Sink,
}

impl FanOut {
    /// Combine two sinks.
    pub fn new(console: Sink, file: Sink) -> Self {
        Self { console, file }
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("console", &self.console.name())
            .field("file", &self.file.name())
            .finish()
    }
}

impl Destination for FanOut {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let console = self.console.write_all(buf);
        let file = self.file.write_all(buf);
        console.and(file)
    }

    fn flush(&self) -> io::Result<()> {
        let console = self.console.flush();
        let file = self.file.flush();
        console.and(file)
    }

    fn name(&self) -> String {
        format!("{}+{}", self.console.name(), self.file.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Fails every write and counts attempts.
    #[derive(Default)]
    struct Broken {
        attempts: Mutex<usize>,
    }

    impl Destination for Broken {
        fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
            *self.attempts.lock() += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn name(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_file_sink_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "old line\n").unwrap();

        let sink = FileSink::open(&path).unwrap();
        sink.write_all(b"new line\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old line\nnew line\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_file_sink_open_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("app.log");
        assert!(FileSink::open(path).is_err());
    }

    #[test]
    fn test_file_sink_concurrent_lines_stay_whole() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("busy.log");
        let sink = Arc::new(FileSink::open(&path).unwrap());

        std::thread::scope(|scope| {
            for worker in 0..8u8 {
                let sink = sink.clone();
                scope.spawn(move || {
                    let fill = char::from(b'a' + worker).to_string().repeat(4096);
                    let line = format!("worker{} {}\n", worker, fill);
                    for _ in 0..200 {
                        sink.write_all(line.as_bytes()).unwrap();
                    }
                });
            }
        });

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 8 * 200);
        for line in lines {
            let (tag, fill) = line.split_once(' ').unwrap();
            let worker: u8 = tag.trim_start_matches("worker").parse().unwrap();
            assert_eq!(fill.len(), 4096);
            assert!(fill.bytes().all(|b| b == b'a' + worker));
        }
    }

    #[test]
    fn test_fan_out_identical_bytes() {
        let console = MemorySink::new();
        let file = MemorySink::new();
        let fan = FanOut::new(console.sink(), file.sink());

        fan.write_all(b"WARN: disk low\n").unwrap();

        assert_eq!(console.bytes(), b"WARN: disk low\n".to_vec());
        assert_eq!(console.bytes(), file.bytes());
        assert_eq!(fan.name(), "memory+memory");
    }

    #[test]
    fn test_fan_out_continues_after_failure() {
        let broken = Arc::new(Broken::default());
        let file = MemorySink::new();
        let fan = FanOut::new(broken.clone(), file.sink());

        let err = fan.write_all(b"ERROR: boom\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(*broken.attempts.lock(), 1);
        assert_eq!(file.contents(), "ERROR: boom\n");

        let console = MemorySink::new();
        let fan = FanOut::new(console.sink(), broken.clone());
        assert!(fan.write_all(b"x\n").is_err());
        assert_eq!(console.contents(), "x\n");
        assert_eq!(*broken.attempts.lock(), 2);
    }

    #[test]
    fn test_discard() {
        let sink = discard();
        assert!(sink.is_discard());
        assert!(sink.write_all(b"gone").is_ok());
        assert!(!stdout().is_discard());
        assert_eq!(stderr().name(), "stderr");
    }
}
