//! Enumerator - forward, restartable, pull-based traversal
//!
//! Captures its owner's live version at creation and on `reset`. Every
//! step re-validates the owner transitively and then compares the
//! captured version against the live one, so any structural edit after
//! creation, including one made through the owner itself, invalidates
//! the enumerator. Capacity-only operations leave it usable.
//!
//! The buffer is re-resolved from the root on every step; the enumerator
//! only remembers which buffer epoch it last read from.

use crate::observability::{log_event, Event};

use super::errors::{SeqError, SeqResult};
use super::node::Handle;
use super::validator::{Resolved, VersionValidator};
use super::Version;

/// Cursor over a root or view, guarded by a captured version.
pub struct Enumerator<T> {
    owner: Handle<T>,
    recorded: Version,
    cursor: usize,
    current: Option<T>,
    buffer_epoch: u64,
    failed: bool,
}

impl<T> Enumerator<T> {
    pub(crate) fn new(owner: Handle<T>) -> SeqResult<Self> {
        let (recorded, buffer_epoch) = {
            let state = owner.borrow_root()?;
            let resolved = VersionValidator::validate(&owner, &state)?;
            state.metrics().increment_enumerators_created();
            (resolved.version, state.buffer_epoch())
        };
        Ok(Self {
            owner,
            recorded,
            cursor: 0,
            current: None,
            buffer_epoch,
            failed: false,
        })
    }

    /// Version captured at creation or the last `reset`.
    pub fn recorded_version(&self) -> Version {
        self.recorded
    }

    /// Element produced by the last successful `move_next`.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Rewind to before the first element and re-capture the live version.
    ///
    /// Fails if the owner itself is stale.
    pub fn reset(&mut self) -> SeqResult<()> {
        let (version, epoch) = {
            let state = self.owner.borrow_root()?;
            let resolved = VersionValidator::validate(&self.owner, &state)?;
            (resolved.version, state.buffer_epoch())
        };
        self.recorded = version;
        self.buffer_epoch = epoch;
        self.cursor = 0;
        self.current = None;
        self.failed = false;
        Ok(())
    }

    fn check_captured(&self, resolved: &Resolved) -> SeqResult<()> {
        if resolved.version == self.recorded {
            Ok(())
        } else {
            Err(SeqError::StaleHandle {
                recorded: self.recorded,
                live: resolved.version,
            })
        }
    }
}

impl<T: Clone> Enumerator<T> {
    /// Advance to the next element. Returns `Ok(false)` past the end.
    pub fn move_next(&mut self) -> SeqResult<bool> {
        let state = self.owner.borrow_root()?;
        let resolved = VersionValidator::validate(&self.owner, &state)?;
        if let Err(err) = self.check_captured(&resolved) {
            state.metrics().increment_stale_rejections();
            log_event(Event::StaleHandleRejected);
            return Err(err);
        }

        if state.buffer_epoch() != self.buffer_epoch {
            self.buffer_epoch = state.buffer_epoch();
            log_event(Event::EnumeratorBufferRefreshed);
        }

        if self.cursor < resolved.len {
            self.current = Some(state.item(resolved.offset + self.cursor).clone());
            self.cursor += 1;
            Ok(true)
        } else {
            self.current = None;
            Ok(false)
        }
    }
}

/// Yields `Ok(item)` per element; a stale or re-entrant step yields one
/// `Err` and then ends the iteration.
impl<T: Clone> Iterator for Enumerator<T> {
    type Item = SeqResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.move_next() {
            Ok(true) => self.current.clone().map(Ok),
            Ok(false) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
