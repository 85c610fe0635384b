//! seqview - a growable sequence with live, nestable windows
//!
//! One `RootSequence` owns a single buffer. Any number of `View`s, nested
//! to any depth, window into it and edit it in place. A per-root version
//! counter separates harmless capacity changes from structural edits and
//! turns every outdated handle into a `SeqError::StaleHandle`.
//!
//! ```
//! use seqview::{RootSequence, Sequenced};
//!
//! let root: RootSequence<i32> = (1..=10).collect();
//! let view = root.view(2, 5).unwrap();
//! root.ensure_capacity(100).unwrap(); // capacity only: view stays valid
//! view.push(11).unwrap();
//! assert_eq!(root.to_vec().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 11, 8, 9, 10]);
//! ```
//!
//! Handles are single-threaded (`!Send`); only same-thread misuse is detected.

pub mod observability;
pub mod sequence;

pub use sequence::{
    CapacityManager, Enumerator, RootSequence, SeqError, SeqErrorCode, SeqResult, SequenceConfig,
    Sequenced, Version, View,
};
