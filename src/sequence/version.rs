//! Version - Tree-wide structural edit epoch
//!
//! - One counter per root, never process-global
//! - Strictly increases on every structural edit anywhere in the tree
//! - Untouched by capacity-only operations
//!
//! Views and enumerators store the value they last observed; a mismatch
//! against the live value marks them stale.

use std::fmt;

/// A totally ordered structural edit epoch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version(u64);

impl Version {
    /// The epoch every freshly created root starts at.
    pub const INITIAL: Version = Version(0);

    /// Creates a version with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the epoch that follows this one.
    ///
    /// Wrapping would require 2^64 edits on one root; saturate instead.
    #[inline]
    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::INITIAL
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
