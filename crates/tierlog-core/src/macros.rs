//! Logging macros writing through the process-wide handles.
//!
//! Each macro takes `format!`-style arguments and records the call site for
//! the `LONG_FILE`/`SHORT_FILE` headers.
//!
//! ```
//! tierlog_core::warn!("retrying in {}s", 5);
//! ```

/// Write a line through the process-wide debug handle.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::global::debug().write_fmt(::std::format_args!($($arg)+))
    };
}

/// Write a line through the process-wide info handle.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::global::info().write_fmt(::std::format_args!($($arg)+))
    };
}

/// Write a line through the process-wide warn handle.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::global::warn().write_fmt(::std::format_args!($($arg)+))
    };
}

/// Write a line through the process-wide error handle.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::global::error().write_fmt(::std::format_args!($($arg)+))
    };
}

/// Write a line through the process-wide critical handle.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::global::critical().write_fmt(::std::format_args!($($arg)+))
    };
}
