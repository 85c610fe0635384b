//! Tree nodes and the shared edit engine
//!
//! A `Handle` is the tagged variant every operation dispatches on:
//! either the root arena itself or a view node. View nodes are pure
//! window descriptors (relative offset, length, recorded version); they
//! never hold element data or a cached buffer reference.
//!
//! Every operation borrows the root, validates the handle, and only then
//! touches the buffer at the resolved absolute offset.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::observability::{log_event, log_event_with_fields, Event, Logger};

use super::errors::{check_range, SeqError, SeqResult};
use super::storage::RootState;
use super::validator::{Resolved, VersionValidator};
use super::Version;

/// Either the root arena or a view over it.
pub enum Handle<T> {
    Root(Rc<RefCell<RootState<T>>>),
    View(Rc<ViewNode<T>>),
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        match self {
            Handle::Root(root) => Handle::Root(Rc::clone(root)),
            Handle::View(node) => Handle::View(Rc::clone(node)),
        }
    }
}

/// A window `[offset, offset + len)` into its parent's current window.
pub struct ViewNode<T> {
    parent: Handle<T>,
    root: Rc<RefCell<RootState<T>>>,
    offset: Cell<usize>,
    len: Cell<usize>,
    recorded: Cell<Version>,
}

impl<T> ViewNode<T> {
    #[inline]
    pub(crate) fn parent(&self) -> &Handle<T> {
        &self.parent
    }

    /// Offset relative to the parent's window.
    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset.get()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len.get()
    }

    #[inline]
    pub(crate) fn recorded(&self) -> Version {
        self.recorded.get()
    }

    pub(crate) fn set_window(&self, offset: usize, len: usize) {
        self.offset.set(offset);
        self.len.set(len);
    }

    /// Sum of relative offsets from this node up to the root.
    pub(crate) fn absolute_offset(&self) -> usize {
        let mut total = self.offset.get();
        let mut parent = &self.parent;
        while let Handle::View(node) = parent {
            total += node.offset.get();
            parent = &node.parent;
        }
        total
    }
}

impl<T> Handle<T> {
    pub(crate) fn root(&self) -> &Rc<RefCell<RootState<T>>> {
        match self {
            Handle::Root(root) => root,
            Handle::View(node) => &node.root,
        }
    }

    /// The node itself followed by every view ancestor, nearest first.
    pub(crate) fn chain(&self) -> Vec<Rc<ViewNode<T>>> {
        let mut chain = Vec::new();
        let mut current = self;
        while let Handle::View(node) = current {
            chain.push(Rc::clone(node));
            current = &node.parent;
        }
        chain
    }

    /// Length of this handle's window as last recorded, without validation.
    pub(crate) fn recorded_len(&self, state: &RootState<T>) -> usize {
        match self {
            Handle::Root(_) => state.len(),
            Handle::View(node) => node.len(),
        }
    }

    pub(crate) fn borrow_root(&self) -> SeqResult<Ref<'_, RootState<T>>> {
        self.root().try_borrow().map_err(|_| reentrant())
    }

    pub(crate) fn borrow_root_mut(&self) -> SeqResult<RefMut<'_, RootState<T>>> {
        self.root().try_borrow_mut().map_err(|_| reentrant())
    }

    /// Validate and run a read over this handle's window.
    pub(crate) fn read<R>(&self, read: impl FnOnce(&[T]) -> R) -> SeqResult<R> {
        self.inspect(|state, window| read(state.window(window.offset, window.len)))
    }

    /// Validate and run a read-only look at the whole arena.
    pub(crate) fn inspect<R>(&self, op: impl FnOnce(&RootState<T>, Resolved) -> R) -> SeqResult<R> {
        let state = self.borrow_root()?;
        let window = VersionValidator::validate(self, &state)?;
        Ok(op(&state, window))
    }

    /// Validate and resolve this handle without touching elements.
    pub(crate) fn resolve(&self) -> SeqResult<Resolved> {
        let state = self.borrow_root()?;
        VersionValidator::validate(self, &state)
    }

    /// Validate and run a capacity-only operation on the root arena.
    pub(crate) fn with_arena<R>(&self, op: impl FnOnce(&mut RootState<T>) -> R) -> SeqResult<R> {
        let mut state = self.borrow_root_mut()?;
        VersionValidator::validate(self, &state)?;
        Ok(op(&mut state))
    }

    /// Structural edit: `locate` maps the window length to a relative
    /// `(index, removed)` pair, then `inserted` replaces those elements.
    ///
    /// A pair that removes nothing and inserts nothing is a validated no-op.
    pub(crate) fn splice(
        &self,
        locate: impl FnOnce(usize) -> SeqResult<(usize, usize)>,
        inserted: Vec<T>,
    ) -> SeqResult<Vec<T>> {
        let mut state = self.borrow_root_mut()?;
        let window = VersionValidator::validate(self, &state)?;
        let (index, removed) = locate(window.len)?;
        check_range(index, removed, window.len)?;

        if removed == 0 && inserted.is_empty() {
            return Ok(Vec::new());
        }

        let inserted_len = inserted.len();
        let chain = self.chain();
        let taken = state.splice(window.offset + index, removed, inserted, &chain);

        let version = state.version();
        for node in &chain {
            node.len.set(node.len.get() - removed + inserted_len);
            node.recorded.set(version);
        }
        Ok(taken)
    }

    /// Structural edit that keeps the count: runs `edit` over the window.
    ///
    /// The version is bumped only when `edit` succeeds.
    pub(crate) fn permute<R>(&self, edit: impl FnOnce(&mut [T]) -> SeqResult<R>) -> SeqResult<R> {
        let mut state = self.borrow_root_mut()?;
        let window = VersionValidator::validate(self, &state)?;
        let result = state.permute(window.offset, window.len, edit)?;

        let version = state.version();
        for node in self.chain() {
            node.recorded.set(version);
        }
        Ok(result)
    }

    /// Create a child window `[offset, offset + len)` of this handle.
    pub(crate) fn create_view(&self, offset: usize, len: usize) -> SeqResult<Rc<ViewNode<T>>> {
        let mut state = self.borrow_root_mut()?;
        let window = VersionValidator::validate(self, &state)?;
        check_range(offset, len, window.len)?;

        let node = Rc::new(ViewNode {
            parent: self.clone(),
            root: Rc::clone(self.root()),
            offset: Cell::new(offset),
            len: Cell::new(len),
            recorded: Cell::new(window.version),
        });
        state.register_view(&node);

        if Logger::enabled(Event::ViewCreated.severity()) {
            let absolute = (window.offset + offset).to_string();
            let len = len.to_string();
            log_event_with_fields(
                Event::ViewCreated,
                &[("absolute_offset", absolute.as_str()), ("len", len.as_str())],
            );
        }
        Ok(node)
    }

    /// Move a view to `[offset, offset + len)` of its parent's current window.
    ///
    /// Not a structural edit: the version is unchanged and no other
    /// handle is affected.
    pub(crate) fn slide_to(node: &Rc<ViewNode<T>>, offset: usize, len: usize) -> SeqResult<()> {
        let handle = Handle::View(Rc::clone(node));
        let state = handle.borrow_root()?;
        VersionValidator::validate(&handle, &state)?;
        let parent_len = node.parent.recorded_len(&state);
        check_range(offset, len, parent_len)?;
        node.set_window(offset, len);

        if Logger::enabled(Event::ViewSlid.severity()) {
            let offset = offset.to_string();
            let len = len.to_string();
            log_event_with_fields(
                Event::ViewSlid,
                &[("len", len.as_str()), ("offset", offset.as_str())],
            );
        }
        Ok(())
    }
}

fn reentrant() -> SeqError {
    log_event(Event::ReentrantAccessRejected);
    SeqError::Reentrant
}
