//! RootSequence - owner of a view tree
//!
//! Owns the backing buffer, the element count and the tree-wide version
//! counter. A root is never stale: its own edits only invalidate the
//! views hanging off it.

use std::cell::RefCell;
use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

use crate::observability::{log_event_with_fields, Event, Logger, MetricsSnapshot};

use super::config::{CapacityManager, SequenceConfig};
use super::errors::SeqResult;
use super::node::Handle;
use super::sequenced::{Sealed, Sequenced};
use super::storage::RootState;
use super::Version;

/// A growable sequence that views can window into.
pub struct RootSequence<T> {
    handle: Handle<T>,
}

impl<T> RootSequence<T> {
    /// Create an empty sequence with the default policy.
    pub fn new() -> Self {
        Self::from_vec_with_config(Vec::new(), SequenceConfig::default())
    }

    /// Create an empty sequence with `capacity` slots reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(SequenceConfig {
            initial_capacity: capacity,
            ..SequenceConfig::default()
        })
    }

    /// Create an empty sequence from a validated configuration.
    pub fn with_config(config: SequenceConfig) -> Self {
        Self::from_vec_with_config(Vec::new(), config)
    }

    /// Take ownership of `items` as the initial contents.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_vec_with_config(items, SequenceConfig::default())
    }

    pub fn from_vec_with_config(items: Vec<T>, config: SequenceConfig) -> Self {
        let state = RootState::new(items, config);
        if Logger::enabled(Event::SequenceCreated.severity()) {
            let count = state.len().to_string();
            let capacity = state.capacity().to_string();
            log_event_with_fields(
                Event::SequenceCreated,
                &[("capacity", capacity.as_str()), ("count", count.as_str())],
            );
        }
        Self {
            handle: Handle::Root(Rc::new(RefCell::new(state))),
        }
    }

    /// Live tree-wide version.
    pub fn version(&self) -> SeqResult<Version> {
        Ok(self.handle.borrow_root()?.version())
    }

    /// Policy used for growth and trimming.
    pub fn policy(&self) -> SeqResult<CapacityManager> {
        Ok(self.handle.borrow_root()?.policy().clone())
    }

    /// Counters for this tree.
    pub fn metrics(&self) -> SeqResult<MetricsSnapshot> {
        Ok(self.handle.borrow_root()?.metrics().snapshot())
    }

    /// Counters for this tree as a JSON object.
    pub fn metrics_json(&self) -> SeqResult<String> {
        Ok(self.handle.borrow_root()?.metrics().to_json())
    }

    /// Number of views over this tree that are still referenced.
    pub fn live_views(&self) -> SeqResult<usize> {
        self.handle.inspect(|state, _| state.live_views())
    }
}

impl<T> Default for RootSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for RootSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for RootSequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> Sealed<T> for RootSequence<T> {
    fn handle(&self) -> &Handle<T> {
        &self.handle
    }
}

impl<T> Sequenced<T> for RootSequence<T> {}

impl<T: fmt::Debug> fmt::Debug for RootSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle.read(|items| f.debug_list().entries(items).finish()) {
            Ok(result) => result,
            Err(_) => f.write_str("RootSequence(<borrowed>)"),
        }
    }
}
