//! Observability subsystem for seqview
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Per-tree counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on container state
//! 3. Silent by default; raise verbosity with `Logger::set_min_severity`
//!
//! # Usage
//!
//! ```
//! use seqview::observability::{Logger, Severity};
//! use seqview::{RootSequence, Sequenced};
//!
//! Logger::set_min_severity(Severity::Warn);
//! let root: RootSequence<i32> = (1..=4).collect();
//! let view = root.view(1, 2).unwrap();
//! root.push(5).unwrap();
//! assert!(view.len().is_err()); // logs STALE_HANDLE_REJECTED
//! assert_eq!(root.metrics().unwrap().stale_rejections, 1);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
