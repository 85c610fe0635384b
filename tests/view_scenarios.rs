//! View Tree Scenario Tests
//!
//! Tests for nested windows over one shared buffer:
//! - Self-concatenation through a grandchild
//! - Capacity changes under live views
//! - Tree-wide invalidation of siblings and descendants
//! - Count propagation through ancestors

use seqview::{RootSequence, SeqError, Sequenced, Version};

fn root_of(range: std::ops::RangeInclusive<i32>) -> RootSequence<i32> {
    range.collect()
}

// =============================================================================
// Documented Scenarios
// =============================================================================

/// Inserting a grandchild's contents into itself doubles it without aliasing.
#[test]
fn test_grandchild_self_concatenation() {
    let root = root_of(1..=15);
    let view = root.view(2, 10).unwrap();
    assert_eq!(view.to_vec().unwrap(), (3..=12).collect::<Vec<_>>());
    let grandchild = view.view(1, 8).unwrap();
    assert_eq!(grandchild.to_vec().unwrap(), (4..=11).collect::<Vec<_>>());

    grandchild.add_all_from(&grandchild).unwrap();

    assert_eq!(
        root.to_vec().unwrap(),
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]
    );
    assert_eq!(grandchild.len().unwrap(), 16);
    assert_eq!(view.len().unwrap(), 18);
    assert_eq!(root.len().unwrap(), 23);
}

/// Capacity growth swaps the buffer but keeps the view usable.
#[test]
fn test_view_survives_ensure_capacity() {
    let root = root_of(1..=10);
    let view = root.view(2, 5).unwrap();
    assert_eq!(view.to_vec().unwrap(), vec![3, 4, 5, 6, 7]);

    root.ensure_capacity(100).unwrap();
    assert!(view.is_valid());

    view.push(11).unwrap();
    assert_eq!(root.len().unwrap(), 11);
    assert_eq!(
        root.to_vec().unwrap(),
        vec![1, 2, 3, 4, 5, 6, 7, 11, 8, 9, 10]
    );
    assert_eq!(view.to_vec().unwrap(), vec![3, 4, 5, 6, 7, 11]);
}

/// A root edit makes every view stale.
#[test]
fn test_root_edit_invalidates_view() {
    let root = root_of(1..=5);
    let view = root.view(1, 3).unwrap();
    assert_eq!(view.to_vec().unwrap(), vec![2, 3, 4]);

    root.push(6).unwrap();

    assert!(!view.is_valid());
    assert!(view.get(0).unwrap_err().is_stale());
    assert!(view.len().unwrap_err().is_stale());
    assert!(view.to_vec().unwrap_err().is_stale());
    assert!(view.push(7).unwrap_err().is_stale());
    assert!(view.view(0, 1).unwrap_err().is_stale());
    assert!(view.iter().err().unwrap().is_stale());
}

/// Disjoint siblings still invalidate each other.
#[test]
fn test_sibling_edit_invalidates_disjoint_sibling() {
    let root = root_of(1..=8);
    let left = root.view(0, 4).unwrap();
    let right = root.view(4, 4).unwrap();

    left.push(100).unwrap();
    assert_eq!(root.to_vec().unwrap(), vec![1, 2, 3, 4, 100, 5, 6, 7, 8]);

    let err = right.push(200).unwrap_err();
    assert_eq!(
        err,
        SeqError::StaleHandle {
            recorded: Version::INITIAL,
            live: Version::new(1),
        }
    );
    assert_eq!(root.len().unwrap(), 9);
}

// =============================================================================
// Count Propagation Tests
// =============================================================================

/// Removing through a grandchild shrinks every ancestor by the same amount.
#[test]
fn test_grandchild_remove_propagates_counts() {
    let root = root_of(1..=20);
    let view = root.view(2, 15).unwrap();
    let grandchild = view.view(3, 6).unwrap();
    assert_eq!(grandchild.to_vec().unwrap(), vec![6, 7, 8, 9, 10, 11]);

    let removed = grandchild.remove_range(1, 3).unwrap();

    assert_eq!(removed, vec![7, 8, 9]);
    assert_eq!(grandchild.len().unwrap(), 3);
    assert_eq!(view.len().unwrap(), 12);
    assert_eq!(root.len().unwrap(), 17);
    assert_eq!(grandchild.to_vec().unwrap(), vec![6, 10, 11]);
}

/// Elements outside a narrower window are not counted against it.
#[test]
fn test_narrow_window_counts_only_its_elements() {
    let root = root_of(1..=10);
    let view = root.view(0, 8).unwrap();
    let narrow = view.view(2, 2).unwrap();

    narrow.clear().unwrap();

    assert_eq!(narrow.len().unwrap(), 0);
    assert_eq!(view.len().unwrap(), 6);
    assert_eq!(root.to_vec().unwrap(), vec![1, 2, 5, 6, 7, 8, 9, 10]);
}

/// The editing view and its ancestors stay valid; descendants do not.
#[test]
fn test_edit_refreshes_chain_only() {
    let root = root_of(1..=10);
    let parent = root.view(1, 8).unwrap();
    let child = parent.view(1, 6).unwrap();
    let grandchild = child.view(1, 4).unwrap();

    child.insert(0, 42).unwrap();

    assert!(root.to_vec().is_ok());
    assert!(parent.is_valid());
    assert!(child.is_valid());
    assert!(!grandchild.is_valid());
    assert_eq!(parent.to_vec().unwrap(), vec![2, 42, 3, 4, 5, 6, 7, 8, 9]);
}

/// An edit two levels up invalidates a great-grandchild transitively.
#[test]
fn test_staleness_is_transitive() {
    let root = root_of(1..=20);
    let a = root.view(0, 18).unwrap();
    let b = a.view(1, 16).unwrap();
    let c = b.view(1, 14).unwrap();
    let d = c.view(1, 12).unwrap();

    a.remove_at(17).unwrap();

    assert!(a.is_valid());
    assert!(!b.is_valid());
    assert!(!c.is_valid());
    assert!(d.get(0).unwrap_err().is_stale());
}

/// A child of an off-chain view reports staleness after a root insert
/// lands inside its parent.
#[test]
fn test_nested_child_stale_after_root_insert() {
    let root = root_of(0..=9);
    let parent = root.view(0, 5).unwrap();
    let child = parent.view(3, 2).unwrap();

    root.insert(2, 99).unwrap();

    assert!(child.get(0).unwrap_err().is_stale());
    assert!(child.len().unwrap_err().is_stale());
    assert!(parent.len().unwrap_err().is_stale());
    assert_eq!(root.metrics().unwrap().stale_rejections, 3);
}

/// Same through a sibling editor whose append lands inside the other subtree.
#[test]
fn test_nested_child_stale_after_sibling_append() {
    let root = root_of(0..=9);
    let editor = root.view(0, 3).unwrap();
    let parent = root.view(1, 5).unwrap();
    let child = parent.view(3, 2).unwrap();

    editor.push(99).unwrap();

    let err = child.len().unwrap_err();
    assert_eq!(
        err,
        SeqError::StaleHandle {
            recorded: Version::INITIAL,
            live: Version::new(1),
        }
    );
    assert!(child.view(0, 0).unwrap_err().is_stale());
}

// =============================================================================
// Window Creation Tests
// =============================================================================

/// Zero-length windows are always legal, even at the very end.
#[test]
fn test_zero_length_windows() {
    let root = root_of(1..=5);
    for offset in 0..=5 {
        let empty = root.view(offset, 0).unwrap();
        assert!(empty.is_valid());
        assert!(empty.is_empty().unwrap());
        assert_eq!(empty.to_vec().unwrap(), Vec::<i32>::new());
    }

    let nested = root.view(1, 3).unwrap().view(3, 0).unwrap();
    assert!(nested.is_empty().unwrap());

    let empty_root: RootSequence<i32> = RootSequence::new();
    let empty = empty_root.view(0, 0).unwrap();
    empty.push(1).unwrap();
    assert_eq!(empty_root.to_vec().unwrap(), vec![1]);
}

/// Windows outside the parent's current window are range errors.
#[test]
fn test_out_of_window_creation() {
    let root = root_of(1..=5);
    assert!(root.view(4, 2).unwrap_err().is_range());
    assert!(root.view(6, 0).unwrap_err().is_range());

    let view = root.view(1, 3).unwrap();
    let err = view.view(2, 2).unwrap_err();
    assert_eq!(
        err,
        SeqError::RangeOutOfBounds {
            offset: 2,
            len: 2,
            window: 3
        }
    );
}

/// A stale view reports staleness before argument errors.
#[test]
fn test_stale_wins_over_range() {
    let root = root_of(1..=5);
    let view = root.view(1, 3).unwrap();
    root.remove_at(0).unwrap();
    assert!(view.get(99).unwrap_err().is_stale());
    assert!(view.view(99, 99).unwrap_err().is_stale());
}

/// Recovery is re-creation from a known-good ancestor.
#[test]
fn test_recreate_after_stale() {
    let root = root_of(1..=5);
    let view = root.view(1, 3).unwrap();
    root.insert(0, 0).unwrap();
    assert!(!view.is_valid());

    let fresh = root.view(2, 3).unwrap();
    assert_eq!(fresh.to_vec().unwrap(), vec![2, 3, 4]);
}

// =============================================================================
// Mutation Through Views
// =============================================================================

/// Permutations stay inside the window.
#[test]
fn test_window_permutations() {
    let root = root_of(1..=8);
    let view = root.view(2, 4).unwrap();

    view.reverse().unwrap();
    assert_eq!(root.to_vec().unwrap(), vec![1, 2, 6, 5, 4, 3, 7, 8]);

    view.sort().unwrap();
    assert_eq!(root.to_vec().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);

    view.swap(0, 3).unwrap();
    assert_eq!(root.to_vec().unwrap(), vec![1, 2, 6, 4, 5, 3, 7, 8]);

    view.sort_by(|a, b| b.cmp(a)).unwrap();
    assert_eq!(view.to_vec().unwrap(), vec![6, 5, 4, 3]);
    assert_eq!(root.len().unwrap(), 8);
}

/// Each structural edit bumps the root exactly once, even for bulk inserts.
#[test]
fn test_bulk_edit_bumps_once() {
    let root = root_of(1..=4);
    let view = root.view(1, 2).unwrap();

    view.insert_all(1, 100..200).unwrap();
    assert_eq!(root.version().unwrap(), Version::new(1));
    assert_eq!(view.recorded_version(), Version::new(1));
    assert_eq!(view.len().unwrap(), 102);

    view.remove_range(0, 50).unwrap();
    assert_eq!(root.version().unwrap(), Version::new(2));
    assert_eq!(root.metrics().unwrap().structural_edits, 2);
}

/// Inserting a view's contents into its parent uses a snapshot.
#[test]
fn test_insert_child_into_parent() {
    let root = root_of(1..=6);
    let view = root.view(0, 6).unwrap();
    let tail = view.view(3, 3).unwrap();

    view.insert_from(0, &tail).unwrap();

    assert_eq!(root.to_vec().unwrap(), vec![4, 5, 6, 1, 2, 3, 4, 5, 6]);
    assert!(!tail.is_valid());
}

/// A root can insert a snapshot of itself.
#[test]
fn test_root_self_insert() {
    let root = root_of(1..=3);
    root.insert_from(1, &root).unwrap();
    assert_eq!(root.to_vec().unwrap(), vec![1, 1, 2, 3, 2, 3]);
}

// =============================================================================
// Query Tests
// =============================================================================

/// Searches are relative to the window, not the root.
#[test]
fn test_window_relative_search() {
    let root: RootSequence<i32> = vec![7, 1, 2, 7, 3, 7, 9].into();
    let view = root.view(1, 5).unwrap();

    assert_eq!(view.first().unwrap(), Some(1));
    assert_eq!(view.last().unwrap(), Some(7));
    assert!(view.contains(&3).unwrap());
    assert!(!view.contains(&9).unwrap());
    assert_eq!(view.index_of(&7).unwrap(), Some(2));
    assert_eq!(view.last_index_of(&7).unwrap(), Some(4));
    assert_eq!(view.find(|x| *x > 2).unwrap(), Some(7));
    assert_eq!(view.find_index(|x| *x == 3).unwrap(), Some(3));
    assert_eq!(view.find_index(|x| *x == 9).unwrap(), None);
}

#[test]
fn test_binary_search_in_window() {
    let root: RootSequence<i32> = vec![100, 1, 3, 5, 7, 0].into();
    let view = root.view(1, 4).unwrap();
    assert_eq!(view.binary_search(&5).unwrap(), Ok(2));
    assert_eq!(view.binary_search(&4).unwrap(), Err(2));
    assert_eq!(view.binary_search_by(|x| x.cmp(&8)).unwrap(), Err(4));
}

/// Equal windows compare and hash equal, across trees or within one.
#[test]
fn test_sequence_eq_and_hash() {
    let a: RootSequence<i32> = vec![1, 2, 3, 1, 2, 3].into();
    let b: RootSequence<i32> = vec![1, 2, 3].into();
    let left = a.view(0, 3).unwrap();
    let right = a.view(3, 3).unwrap();

    assert!(left.sequence_eq(&right).unwrap());
    assert!(left.sequence_eq(&b).unwrap());
    assert!(!a.sequence_eq(&b).unwrap());
    assert_eq!(left.content_hash().unwrap(), b.content_hash().unwrap());

    b.push(4).unwrap();
    assert!(!left.sequence_eq(&b).unwrap());
}

#[test]
fn test_copy_to_requires_room() {
    let root: RootSequence<i32> = (1..=5).collect();
    let view = root.view(1, 3).unwrap();

    let mut dest = [0; 4];
    view.copy_to(&mut dest).unwrap();
    assert_eq!(dest, [2, 3, 4, 0]);

    let mut small = [0; 2];
    assert!(matches!(
        view.copy_to(&mut small),
        Err(SeqError::InvalidArgument(_))
    ));
}

/// Shuffling a window keeps its elements and leaves the rest alone.
#[test]
fn test_shuffle_stays_in_window() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let root: RootSequence<i32> = (0..20).collect();
    let view = root.view(5, 10).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    view.shuffle(&mut rng).unwrap();

    let items = root.to_vec().unwrap();
    assert_eq!(&items[..5], &[0, 1, 2, 3, 4]);
    assert_eq!(&items[15..], &[15, 16, 17, 18, 19]);
    let mut middle = items[5..15].to_vec();
    middle.sort();
    assert_eq!(middle, (5..15).collect::<Vec<_>>());
    assert_eq!(root.version().unwrap(), Version::new(1));
}
