//! Windowed sequence subsystem
//!
//! A `RootSequence` owns one growable buffer; any number of `View`s
//! window into it, recursively, and edit it in place.
//!
//! # Design Principles
//!
//! - Arena + window descriptor: views never copy or cache storage
//! - One version counter per root: coarse, tree-wide invalidation
//! - Capacity changes swap the buffer but never the version
//!
//! # Invariants
//!
//! - `0 <= count <= capacity`
//! - A view's `offset + len` fits its parent's window at last validation
//! - Every structural edit bumps the root version exactly once; the
//!   editing handle and its ancestors are refreshed, every other view
//!   and enumerator over the tree is stale from then on
//! - A stale handle is never repaired; create a new one from a valid ancestor

mod config;
mod enumerator;
mod errors;
mod node;
mod root;
mod sequenced;
mod storage;
mod validator;
mod version;
mod view;

pub use config::{CapacityManager, SequenceConfig};
pub use enumerator::Enumerator;
pub use errors::{SeqError, SeqErrorCode, SeqResult, Severity};
pub use root::RootSequence;
pub use sequenced::Sequenced;
pub use version::Version;
pub use view::View;
