//! View - a live window onto a root or another view
//!
//! A view owns no storage. It records its parent, its offset into the
//! parent's window, its length and the version it last observed. Edits
//! made through a view land in the root buffer and resize every
//! ancestor; every handle off that chain becomes stale.

use std::fmt;
use std::rc::Rc;

use super::errors::{SeqError, SeqResult};
use super::node::{Handle, ViewNode};
use super::sequenced::{Sealed, Sequenced};
use super::Version;

/// A mutable, sub-windowable handle onto `[offset, offset + len)` of its parent.
pub struct View<T> {
    node: Rc<ViewNode<T>>,
    handle: Handle<T>,
}

impl<T> View<T> {
    pub(crate) fn from_node(node: Rc<ViewNode<T>>) -> Self {
        let handle = Handle::View(Rc::clone(&node));
        Self { node, handle }
    }

    fn node(&self) -> &Rc<ViewNode<T>> {
        &self.node
    }

    /// Version this view last observed.
    pub fn recorded_version(&self) -> Version {
        self.node().recorded()
    }

    /// Offset relative to the parent's window.
    pub fn relative_offset(&self) -> SeqResult<usize> {
        self.handle.resolve()?;
        Ok(self.node().offset())
    }

    /// Move this window to `[offset, offset + len)` of the parent's window.
    pub fn slide_to(&self, offset: usize, len: usize) -> SeqResult<()> {
        Handle::slide_to(self.node(), offset, len)
    }

    /// Shift this window by `delta` inside the parent, keeping its length.
    pub fn slide(&self, delta: isize) -> SeqResult<()> {
        let node = self.node();
        self.handle.resolve()?;
        let offset = node
            .offset()
            .checked_add_signed(delta)
            .ok_or_else(|| SeqError::InvalidArgument(format!(
                "cannot slide offset {} by {}",
                node.offset(),
                delta
            )))?;
        Handle::slide_to(node, offset, node.len())
    }
}

impl<T> Clone for View<T> {
    /// Another handle to the same window; edits through either keep both valid.
    fn clone(&self) -> Self {
        Self::from_node(Rc::clone(&self.node))
    }
}

impl<T> Sealed<T> for View<T> {
    fn handle(&self) -> &Handle<T> {
        &self.handle
    }
}

impl<T> Sequenced<T> for View<T> {}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node();
        f.debug_struct("View")
            .field("offset", &node.offset())
            .field("len", &node.len())
            .field("recorded", &node.recorded())
            .finish()
    }
}
