//! VersionValidator - transitive stale-handle detection
//!
//! Run before every public operation. Walks from a handle to the root;
//! at each hop the node's recorded version must equal its immediate
//! ancestor's live version (the root's counter, or a parent view's own
//! recorded version). The first mismatch fails the whole operation, so
//! an edit two levels up invalidates a great-grandchild that never
//! touched the middle ancestors.
//!
//! Once every version matches, each hop's window must also still fit its
//! parent's current window; a parent narrowed by `slide_to` leaves an
//! overhanging child unusable. Staleness always wins over geometry.

use crate::observability::{log_event_with_fields, Event, Logger};

use super::errors::{check_range, SeqError, SeqResult};
use super::node::{Handle, ViewNode};
use super::storage::RootState;
use super::Version;

/// A validated handle resolved against the root buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    /// Absolute offset of the window in the root buffer.
    pub offset: usize,
    /// Length of the window.
    pub len: usize,
    /// Live root version at validation time.
    pub version: Version,
}

/// Version chain validation over a view tree.
pub(crate) struct VersionValidator;

impl VersionValidator {
    /// Resolve without side effects.
    pub(crate) fn check<T>(handle: &Handle<T>, state: &RootState<T>) -> SeqResult<Resolved> {
        let node = match handle {
            Handle::Root(_) => {
                return Ok(Resolved {
                    offset: 0,
                    len: state.len(),
                    version: state.version(),
                })
            }
            Handle::View(node) => node,
        };

        // Versions first, over the whole chain: a stale ancestor can leave
        // re-anchored descendants with windows that no longer fit.
        let mut current: &ViewNode<T> = node;
        loop {
            let live = match current.parent() {
                Handle::Root(_) => state.version(),
                Handle::View(parent) => parent.recorded(),
            };
            if current.recorded() != live {
                return Err(SeqError::StaleHandle {
                    recorded: current.recorded(),
                    live,
                });
            }
            match current.parent() {
                Handle::Root(_) => break,
                Handle::View(parent) => current = parent,
            }
        }

        let mut offset = 0;
        let mut current: &ViewNode<T> = node;
        loop {
            let window = match current.parent() {
                Handle::Root(_) => state.len(),
                Handle::View(parent) => parent.len(),
            };
            check_range(current.offset(), current.len(), window)?;
            offset += current.offset();
            match current.parent() {
                Handle::Root(_) => break,
                Handle::View(parent) => current = parent,
            }
        }

        debug_assert!(offset + node.len() <= state.len());
        Ok(Resolved {
            offset,
            len: node.len(),
            version: state.version(),
        })
    }

    /// Resolve, recording and logging a stale rejection on failure.
    pub(crate) fn validate<T>(handle: &Handle<T>, state: &RootState<T>) -> SeqResult<Resolved> {
        Self::check(handle, state).map_err(|err| {
            if let SeqError::StaleHandle { recorded, live } = &err {
                state.metrics().increment_stale_rejections();
                if Logger::enabled(Event::StaleHandleRejected.severity()) {
                    let recorded = recorded.to_string();
                    let live = live.to_string();
                    log_event_with_fields(
                        Event::StaleHandleRejected,
                        &[("live", live.as_str()), ("recorded", recorded.as_str())],
                    );
                }
            }
            err
        })
    }
}
