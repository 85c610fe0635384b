//! Observable sequence events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in a sequence tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A root sequence was created
    SequenceCreated,
    /// A window was created over a root or a view
    ViewCreated,
    /// A view was moved inside its parent
    ViewSlid,
    /// The backing buffer was swapped for a differently sized one
    BufferReallocated,
    /// An enumerator noticed a swapped buffer and re-resolved it
    EnumeratorBufferRefreshed,
    /// A handle failed version validation
    StaleHandleRejected,
    /// A call touched a tree that was already borrowed
    ReentrantAccessRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SequenceCreated => "SEQUENCE_CREATED",
            Event::ViewCreated => "VIEW_CREATED",
            Event::ViewSlid => "VIEW_SLID",
            Event::BufferReallocated => "BUFFER_REALLOCATED",
            Event::EnumeratorBufferRefreshed => "ENUMERATOR_BUFFER_REFRESHED",
            Event::StaleHandleRejected => "STALE_HANDLE_REJECTED",
            Event::ReentrantAccessRejected => "REENTRANT_ACCESS_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StaleHandleRejected | Event::ReentrantAccessRejected => Severity::Warn,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::SequenceCreated,
            Event::ViewCreated,
            Event::ViewSlid,
            Event::BufferReallocated,
            Event::EnumeratorBufferRefreshed,
            Event::StaleHandleRejected,
            Event::ReentrantAccessRejected,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::StaleHandleRejected.severity(), Severity::Warn);
        assert_eq!(Event::BufferReallocated.severity(), Severity::Trace);
    }
}
