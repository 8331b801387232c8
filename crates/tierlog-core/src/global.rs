//! The process-wide router.
//!
//! This is the one sanctioned global in tierlog. Code that prefers explicit
//! wiring can construct its own [`Router`] and pass it around instead.

use once_cell::sync::Lazy;

use crate::handle::Handle;
use crate::router::Router;

static GLOBAL: Lazy<Router> = Lazy::new(Router::new);

/// Get the process-wide router, created in the default configuration on
/// first use.
pub fn global() -> &'static Router {
    &GLOBAL
}

/// Process-wide debug handle.
pub fn debug() -> &'static Handle {
    global().debug()
}

/// Process-wide info handle.
pub fn info() -> &'static Handle {
    global().info()
}

/// Process-wide warn handle.
pub fn warn() -> &'static Handle {
    global().warn()
}

/// Process-wide error handle.
pub fn error() -> &'static Handle {
    global().error()
}

/// Process-wide critical handle.
pub fn critical() -> &'static Handle {
    global().critical()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use tierlog_types::{FormatFlags, Severity};

    // The only test touching the global router.
    #[test]
    fn test_global_handles_and_macros() {
        assert!(std::ptr::eq(global(), global()));
        assert!(std::ptr::eq(warn(), global().handle(Severity::Warn)));

        let console = MemorySink::new();
        let file = MemorySink::new();
        global().set_console_sinks(console.sink(), console.sink());
        global().set_file_destination(file.sink());
        global().set_format_flags(FormatFlags::SHORT_FILE);
        global().set_file_threshold(Severity::Debug);

        let line = line!() + 1;
        crate::debug!("loaded {} entries", 3);
        crate::critical!("giving up");
        info().println("plain");

        let lines: Vec<String> = file.contents().lines().map(String::from).collect();
        assert_eq!(lines[0], format!("DEBUG: global.rs:{}: loaded 3 entries", line));
        assert_eq!(lines[1], format!("CRITICAL: global.rs:{}: giving up", line + 1));
        assert!(lines[2].starts_with("INFO: global.rs:"));
        assert_eq!(console.contents(), format!("{}\n", lines[1]));

        global().set_console_sinks(crate::sink::stdout(), crate::sink::stderr());
        global().clear_file_sink();
        global().set_format_flags(FormatFlags::STD);
        global().set_file_threshold(Severity::Info);
    }
}
