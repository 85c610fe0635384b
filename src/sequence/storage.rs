//! RootState - the single arena shared by a whole view tree
//!
//! Holds the backing buffer, the logical capacity, the tree-wide version
//! and a registry of live view nodes. Only this type reallocates storage.
//!
//! # Invariants
//!
//! - `items.len() <= capacity <= items.capacity()`
//! - `version` advances exactly once per structural edit
//! - capacity changes advance `buffer_epoch`, never `version`

use std::ptr;
use std::rc::{Rc, Weak};

use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};

use super::config::{CapacityManager, SequenceConfig};
use super::node::{Handle, ViewNode};
use super::Version;

pub struct RootState<T> {
    items: Vec<T>,
    capacity: usize,
    version: Version,
    buffer_epoch: u64,
    policy: CapacityManager,
    views: Vec<Weak<ViewNode<T>>>,
    metrics: MetricsRegistry,
}

impl<T> RootState<T> {
    pub(crate) fn new(items: Vec<T>, config: SequenceConfig) -> Self {
        let capacity = items.len().max(config.initial_capacity);
        let mut items = items;
        if items.capacity() < capacity {
            items.reserve_exact(capacity - items.len());
        }
        Self {
            items,
            capacity,
            version: Version::INITIAL,
            buffer_epoch: 0,
            policy: config.capacity,
            views: Vec::new(),
            metrics: MetricsRegistry::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Identity of the current buffer; changes whenever it is swapped.
    #[inline]
    pub(crate) fn buffer_epoch(&self) -> u64 {
        self.buffer_epoch
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub(crate) fn policy(&self) -> &CapacityManager {
        &self.policy
    }

    pub(crate) fn window(&self, offset: usize, len: usize) -> &[T] {
        &self.items[offset..offset + len]
    }

    pub(crate) fn item(&self, index: usize) -> &T {
        &self.items[index]
    }

    pub(crate) fn live_views(&self) -> usize {
        self.views.iter().filter(|view| view.strong_count() > 0).count()
    }

    pub(crate) fn register_view(&mut self, node: &Rc<ViewNode<T>>) {
        self.views.retain(|view| view.strong_count() > 0);
        self.views.push(Rc::downgrade(node));
        self.metrics.increment_views_created();
    }

    // ==================== Capacity ====================

    pub(crate) fn ensure_capacity(&mut self, min: usize) {
        if let Some(target) = self.policy.grown_capacity(self.capacity, min) {
            self.reallocate(target);
        }
    }

    pub(crate) fn set_capacity(&mut self, requested: usize) {
        if let Some(target) = self
            .policy
            .requested_capacity(requested, self.items.len(), self.capacity)
        {
            self.reallocate(target);
        }
    }

    pub(crate) fn trim_excess(&mut self) {
        if let Some(target) = self.policy.trimmed_capacity(self.items.len(), self.capacity) {
            self.reallocate(target);
        }
    }

    /// Moves the live elements into a freshly sized buffer and swaps it in.
    fn reallocate(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.items.len());
        let mut fresh = Vec::with_capacity(capacity);
        fresh.append(&mut self.items);
        self.items = fresh;

        let previous = self.capacity;
        self.capacity = capacity;
        self.buffer_epoch += 1;
        self.metrics.increment_reallocations();

        if Logger::enabled(Event::BufferReallocated.severity()) {
            let count = self.items.len().to_string();
            let from = previous.to_string();
            let to = capacity.to_string();
            log_event_with_fields(
                Event::BufferReallocated,
                &[("count", count.as_str()), ("from", from.as_str()), ("to", to.as_str())],
            );
        }
    }

    // ==================== Structural edits ====================

    /// Replaces `removed` elements at absolute position `at` with `inserted`.
    ///
    /// `chain` is the invoking view and its ancestors; their windows contain
    /// the edit and are adjusted by the caller. Every other registered view
    /// is re-anchored so it still denotes the elements it held before.
    pub(crate) fn splice(
        &mut self,
        at: usize,
        removed: usize,
        inserted: Vec<T>,
        chain: &[Rc<ViewNode<T>>],
    ) -> Vec<T> {
        let inserted_len = inserted.len();
        let new_len = self.items.len() - removed + inserted_len;
        self.ensure_capacity(new_len);

        let taken: Vec<T> = self.items.splice(at..at + removed, inserted).collect();
        self.reanchor_views(chain, at, removed, inserted_len);
        self.bump_version();
        taken
    }

    /// Runs an in-place edit over `[at, at + len)`; bumps the version on success.
    pub(crate) fn permute<R, E>(
        &mut self,
        at: usize,
        len: usize,
        edit: impl FnOnce(&mut [T]) -> Result<R, E>,
    ) -> Result<R, E> {
        let result = edit(&mut self.items[at..at + len])?;
        self.bump_version();
        Ok(result)
    }

    fn bump_version(&mut self) {
        self.version = self.version.next();
        self.metrics.increment_structural_edits();
    }

    fn reanchor_views(
        &mut self,
        chain: &[Rc<ViewNode<T>>],
        at: usize,
        removed: usize,
        inserted: usize,
    ) {
        self.views.retain(|view| view.strong_count() > 0);

        let on_chain =
            |node: &Rc<ViewNode<T>>| chain.iter().any(|c| ptr::eq(Rc::as_ptr(c), Rc::as_ptr(node)));
        let edit_end = at + removed;
        // Where a window starting at `abs` starts after the edit. Starts in
        // the removed region land after the inserted block.
        let shift = |abs: usize| {
            if abs < at {
                abs
            } else if abs >= edit_end {
                abs - removed + inserted
            } else {
                at + inserted
            }
        };

        // Plan against the old layout first; parents and children move together.
        let plan: Vec<(Rc<ViewNode<T>>, usize, usize)> = self
            .views
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|node| !on_chain(node))
            .map(|node| {
                let old_abs = node.absolute_offset();
                let old_end = old_abs + node.len();
                let parent_abs = match node.parent() {
                    Handle::Root(_) => 0,
                    Handle::View(parent) if on_chain(parent) => parent.absolute_offset(),
                    Handle::View(parent) => shift(parent.absolute_offset()),
                };
                let overlap = old_end.min(edit_end).saturating_sub(old_abs.max(at));
                let grown = if old_abs < at && at < old_end {
                    inserted
                } else {
                    0
                };
                let offset = shift(old_abs).saturating_sub(parent_abs);
                let len = node.len() - overlap + grown;
                (node, offset, len)
            })
            .collect();

        for (node, offset, len) in plan {
            node.set_window(offset, len);
        }
    }
}
