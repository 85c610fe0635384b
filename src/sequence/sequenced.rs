//! Sequenced - the operation surface shared by roots and views
//!
//! Every method validates the handle before doing anything else, so a
//! stale view fails with `SeqError::StaleHandle` even when its arguments
//! are also out of range. Indices are relative to the handle's window.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::Rng;

use super::enumerator::Enumerator;
use super::errors::{check_index, check_insert_index, SeqError, SeqResult};
use super::node::Handle;
use super::view::View;

mod private {
    use super::Handle;

    pub trait Sealed<T> {
        fn handle(&self) -> &Handle<T>;
    }
}

pub(crate) use private::Sealed;

/// Indexed, windowable sequence operations.
///
/// Implemented by [`RootSequence`](super::RootSequence) and [`View`].
pub trait Sequenced<T>: Sealed<T> {
    // ==================== Queries ====================

    /// Number of elements in this window.
    fn len(&self) -> SeqResult<usize> {
        self.handle().read(<[T]>::len)
    }

    fn is_empty(&self) -> SeqResult<bool> {
        self.handle().read(<[T]>::is_empty)
    }

    /// True while the handle still matches its ancestor chain.
    ///
    /// Pure check: does not count as a rejection.
    fn is_valid(&self) -> bool {
        let handle = self.handle();
        match handle.borrow_root() {
            Ok(state) => super::validator::VersionValidator::check(handle, &state).is_ok(),
            Err(_) => false,
        }
    }

    /// Absolute offset of this window in the root buffer.
    fn offset(&self) -> SeqResult<usize> {
        Ok(self.handle().resolve()?.offset)
    }

    /// Element at `index`.
    fn get(&self, index: usize) -> SeqResult<T>
    where
        T: Clone,
    {
        self.handle().read(|items| {
            check_index(index, items.len())?;
            Ok(items[index].clone())
        })?
    }

    fn first(&self) -> SeqResult<Option<T>>
    where
        T: Clone,
    {
        self.handle().read(|items| items.first().cloned())
    }

    fn last(&self) -> SeqResult<Option<T>>
    where
        T: Clone,
    {
        self.handle().read(|items| items.last().cloned())
    }

    /// Materialize the window into an owned vector.
    fn to_vec(&self) -> SeqResult<Vec<T>>
    where
        T: Clone,
    {
        self.handle().read(<[T]>::to_vec)
    }

    /// Copy the window into the front of `dest`.
    fn copy_to(&self, dest: &mut [T]) -> SeqResult<()>
    where
        T: Clone,
    {
        self.handle().read(|items| {
            if dest.len() < items.len() {
                return Err(SeqError::InvalidArgument(format!(
                    "destination holds {} elements, {} required",
                    dest.len(),
                    items.len()
                )));
            }
            dest[..items.len()].clone_from_slice(items);
            Ok(())
        })?
    }

    fn contains(&self, item: &T) -> SeqResult<bool>
    where
        T: PartialEq,
    {
        self.handle().read(|items| items.contains(item))
    }

    /// Position of the first element equal to `item`.
    fn index_of(&self, item: &T) -> SeqResult<Option<usize>>
    where
        T: PartialEq,
    {
        self.handle().read(|items| items.iter().position(|x| x == item))
    }

    /// Position of the last element equal to `item`.
    fn last_index_of(&self, item: &T) -> SeqResult<Option<usize>>
    where
        T: PartialEq,
    {
        self.handle().read(|items| items.iter().rposition(|x| x == item))
    }

    /// First element matching `predicate`.
    fn find<P>(&self, mut predicate: P) -> SeqResult<Option<T>>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.handle()
            .read(|items| items.iter().find(|&x| predicate(x)).cloned())
    }

    fn find_index<P>(&self, predicate: P) -> SeqResult<Option<usize>>
    where
        P: FnMut(&T) -> bool,
    {
        self.handle().read(|items| items.iter().position(predicate))
    }

    /// Binary search over a window sorted consistently with `compare`.
    fn binary_search_by<F>(&self, compare: F) -> SeqResult<Result<usize, usize>>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.handle().read(|items| items.binary_search_by(compare))
    }

    fn binary_search(&self, item: &T) -> SeqResult<Result<usize, usize>>
    where
        T: Ord,
    {
        self.binary_search_by(|x| x.cmp(item))
    }

    /// Element-wise equality with another window, possibly in the same tree.
    fn sequence_eq<S>(&self, other: &S) -> SeqResult<bool>
    where
        T: PartialEq,
        S: Sequenced<T> + ?Sized,
    {
        self.handle()
            .read(|mine| other.handle().read(|theirs| mine == theirs))?
    }

    /// Hash of the window contents, consistent with `sequence_eq`.
    fn content_hash(&self) -> SeqResult<u64>
    where
        T: Hash,
    {
        self.handle().read(|items| {
            let mut hasher = DefaultHasher::new();
            items.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Forward enumerator over this window.
    fn iter(&self) -> SeqResult<Enumerator<T>> {
        Enumerator::new(self.handle().clone())
    }

    /// Window `[offset, offset + len)` of this handle's window.
    fn view(&self, offset: usize, len: usize) -> SeqResult<View<T>> {
        Ok(View::from_node(self.handle().create_view(offset, len)?))
    }

    // ==================== Capacity ====================

    /// Capacity of the shared buffer.
    fn capacity(&self) -> SeqResult<usize> {
        self.handle().inspect(|state, _| state.capacity())
    }

    /// Grow the shared buffer so at least `min` elements fit.
    fn ensure_capacity(&self, min: usize) -> SeqResult<()> {
        self.handle().with_arena(|state| state.ensure_capacity(min))
    }

    /// Resize the shared buffer; requests below the count are raised to it.
    fn set_capacity(&self, capacity: usize) -> SeqResult<()> {
        self.handle().with_arena(|state| state.set_capacity(capacity))
    }

    /// Shrink the shared buffer toward the element count.
    fn trim_excess(&self) -> SeqResult<()> {
        self.handle().with_arena(|state| state.trim_excess())
    }

    // ==================== Structural edits ====================

    /// Replace the element at `index`, returning the previous one.
    fn set(&self, index: usize, value: T) -> SeqResult<T> {
        self.handle().permute(|items| {
            check_index(index, items.len())?;
            Ok(std::mem::replace(&mut items[index], value))
        })
    }

    fn insert(&self, index: usize, value: T) -> SeqResult<()> {
        self.insert_all(index, [value])
    }

    /// Append at the end of this window.
    fn push(&self, value: T) -> SeqResult<()> {
        self.extend_from([value])
    }

    /// Insert every item at `index`, in order, as one edit.
    ///
    /// The source is drained before the tree is touched.
    fn insert_all<I>(&self, index: usize, items: I) -> SeqResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        self.handle()
            .splice(
                |len| {
                    check_insert_index(index, len)?;
                    Ok((index, 0))
                },
                items,
            )
            .map(drop)
    }

    /// Append every item at the end of this window as one edit.
    fn extend_from<I>(&self, items: I) -> SeqResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        self.handle().splice(|len| Ok((len, 0)), items).map(drop)
    }

    /// Insert a snapshot of `source` at `index`.
    ///
    /// `source` may be this very window or any handle over the same tree.
    fn insert_from<S>(&self, index: usize, source: &S) -> SeqResult<()>
    where
        T: Clone,
        S: Sequenced<T> + ?Sized,
    {
        let snapshot = source.to_vec()?;
        self.insert_all(index, snapshot)
    }

    /// Append a snapshot of `source`.
    fn add_all_from<S>(&self, source: &S) -> SeqResult<()>
    where
        T: Clone,
        S: Sequenced<T> + ?Sized,
    {
        let snapshot = source.to_vec()?;
        self.extend_from(snapshot)
    }

    fn remove_at(&self, index: usize) -> SeqResult<T> {
        let mut window = 0;
        let taken = self.handle().splice(
            |len| {
                window = len;
                check_index(index, len)?;
                Ok((index, 1))
            },
            Vec::new(),
        )?;
        taken
            .into_iter()
            .next()
            .ok_or(SeqError::IndexOutOfRange { index, len: window })
    }

    /// Remove `count` elements starting at `index`, returning them.
    fn remove_range(&self, index: usize, count: usize) -> SeqResult<Vec<T>> {
        self.handle().splice(|_| Ok((index, count)), Vec::new())
    }

    /// Remove the first element; `None` on an empty window.
    fn remove_first(&self) -> SeqResult<Option<T>> {
        let taken = self
            .handle()
            .splice(|len| Ok((0, len.min(1))), Vec::new())?;
        Ok(taken.into_iter().next())
    }

    /// Remove the last element; `None` on an empty window.
    fn remove_last(&self) -> SeqResult<Option<T>> {
        let taken = self
            .handle()
            .splice(|len| Ok((len.saturating_sub(1), len.min(1))), Vec::new())?;
        Ok(taken.into_iter().next())
    }

    /// Remove the first element equal to `item`. Returns whether one was found.
    fn remove(&self, item: &T) -> SeqResult<bool>
    where
        T: PartialEq,
    {
        match self.index_of(item)? {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Remove every element of this window.
    fn clear(&self) -> SeqResult<()> {
        self.handle().splice(|len| Ok((0, len)), Vec::new()).map(drop)
    }

    fn sort(&self) -> SeqResult<()>
    where
        T: Ord,
    {
        self.sort_by(Ord::cmp)
    }

    /// Stable sort of this window with `compare`.
    ///
    /// `compare` must not touch the same tree; doing so fails that inner
    /// call with `SeqError::Reentrant`.
    fn sort_by<F>(&self, compare: F) -> SeqResult<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.handle().permute(|items| {
            items.sort_by(compare);
            Ok(())
        })
    }

    fn reverse(&self) -> SeqResult<()> {
        self.handle().permute(|items| {
            items.reverse();
            Ok(())
        })
    }

    /// Shuffle this window in place with `rng`.
    fn shuffle<R>(&self, rng: &mut R) -> SeqResult<()>
    where
        R: Rng + ?Sized,
    {
        self.handle().permute(|items| {
            items.shuffle(rng);
            Ok(())
        })
    }

    fn swap(&self, a: usize, b: usize) -> SeqResult<()> {
        self.handle().permute(|items| {
            check_index(a, items.len())?;
            check_index(b, items.len())?;
            items.swap(a, b);
            Ok(())
        })
    }
}
