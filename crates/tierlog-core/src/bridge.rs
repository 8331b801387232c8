//! Bridge from the `tracing` ecosystem to a [`Router`].
//!
//! [`RouterLayer`] is a `tracing-subscriber` layer that turns tracing events
//! into lines on the router's handles, so libraries instrumented with
//! `tracing` follow the same console and log file thresholds as the rest of
//! the application.
//!
//! | tracing level    | handle   |
//! |------------------|----------|
//! | `ERROR`          | Error    |
//! | `WARN`           | Warn     |
//! | `INFO`           | Info     |
//! | `DEBUG`, `TRACE` | Debug    |
//!
//! Events the router emits about itself (target `tierlog` or `tierlog::*`)
//! are not forwarded. Lines carry the event's own source file and line.
//!
//! # Usage
//!
//! ```rust,no_run
//! tierlog_core::bridge::init_tracing(tierlog_core::global())?;
//!
//! tracing::warn!("cache miss rate at {}%", 40);
//! # Ok::<(), tierlog_core::TierlogError>(())
//! ```

use std::fmt::Write as _;
use tierlog_types::{Result, Severity, TierlogError};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::router::Router;

const OWN_TARGET: &str = "tierlog";

/// A tracing layer writing events through a router's handles.
pub struct RouterLayer {
    router: &'static Router,
}

impl RouterLayer {
    /// Create a layer forwarding to `router`.
    pub fn new(router: &'static Router) -> Self {
        Self { router }
    }

    /// Handle severity for a tracing level.
    pub fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG | Level::TRACE => Severity::Debug,
        }
    }

    fn is_own(target: &str) -> bool {
        target == OWN_TARGET || target.starts_with("tierlog::")
    }
}

impl<S> Layer<S> for RouterLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if Self::is_own(metadata.target()) {
            return;
        }

        let handle = self.router.handle(Self::severity_for(metadata.level()));
        if !handle.enabled() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let file = metadata.file().unwrap_or_else(|| metadata.target());
        handle.println_at(visitor.finish(), file, metadata.line().unwrap_or(0));
    }
}

/// Collects the message and any extra fields as `key=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Install a global tracing subscriber that forwards to `router`.
pub fn init_tracing(router: &'static Router) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(RouterLayer::new(router))
        .try_init()
        .map_err(|e| TierlogError::Config(format!("Failed to install tracing subscriber: {}", e)))
}

/// Like [`init_tracing`], filtering events through `RUST_LOG` first.
pub fn init_tracing_from_env(router: &'static Router) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
    tracing_subscriber::registry()
        .with(filter)
        .with(RouterLayer::new(router))
        .try_init()
        .map_err(|e| TierlogError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
