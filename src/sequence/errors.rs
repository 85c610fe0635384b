//! Sequence error types
//!
//! Error codes:
//! - SEQ_INDEX_OUT_OF_RANGE (ERROR)
//! - SEQ_RANGE_OUT_OF_BOUNDS (ERROR)
//! - SEQ_STALE_HANDLE (ERROR)
//! - SEQ_INVALID_ARGUMENT (ERROR)
//! - SEQ_REENTRANT_ACCESS (ERROR)
//! - SEQ_CONFIG_INVALID (ERROR)
//!
//! Every error is raised at the point of detection. None are retried.

use std::fmt;

use thiserror::Error;

use super::Version;

/// Result type for sequence operations
pub type SeqResult<T> = Result<T, SeqError>;

/// Severity levels for sequence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call failed; the tree is unchanged and usable
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Stable error codes for sequence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqErrorCode {
    /// Single index outside the addressable window
    IndexOutOfRange,
    /// Offset/length pair outside the addressable window
    RangeOutOfBounds,
    /// Recorded version no longer matches the ancestor chain
    StaleHandle,
    /// Disallowed or degenerate argument
    InvalidArgument,
    /// The tree was touched while already borrowed by an in-flight call
    ReentrantAccess,
    /// Configuration rejected during load or validation
    ConfigInvalid,
}

impl SeqErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SeqErrorCode::IndexOutOfRange => "SEQ_INDEX_OUT_OF_RANGE",
            SeqErrorCode::RangeOutOfBounds => "SEQ_RANGE_OUT_OF_BOUNDS",
            SeqErrorCode::StaleHandle => "SEQ_STALE_HANDLE",
            SeqErrorCode::InvalidArgument => "SEQ_INVALID_ARGUMENT",
            SeqErrorCode::ReentrantAccess => "SEQ_REENTRANT_ACCESS",
            SeqErrorCode::ConfigInvalid => "SEQ_CONFIG_INVALID",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for SeqErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sequence errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    /// Index outside `[0, len)` (or `[0, len]` for inserts)
    #[error("Index {index} out of range for window of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Window `[offset, offset + len)` does not fit inside `window`
    #[error("Range [{offset}, {offset}+{len}) out of bounds for window of length {window}")]
    RangeOutOfBounds {
        offset: usize,
        len: usize,
        window: usize,
    },

    /// The handle observed an older version than its ancestor chain holds
    #[error("Stale handle: recorded {recorded}, live {live}")]
    StaleHandle { recorded: Version, live: Version },

    /// Disallowed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The tree was accessed from inside a callback of an in-flight call
    #[error("Re-entrant access to a sequence that is already borrowed")]
    Reentrant,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeqError {
    /// Create a config error
    pub fn config_error(message: impl Into<String>) -> Self {
        SeqError::Config(message.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> SeqErrorCode {
        match self {
            SeqError::IndexOutOfRange { .. } => SeqErrorCode::IndexOutOfRange,
            SeqError::RangeOutOfBounds { .. } => SeqErrorCode::RangeOutOfBounds,
            SeqError::StaleHandle { .. } => SeqErrorCode::StaleHandle,
            SeqError::InvalidArgument(_) => SeqErrorCode::InvalidArgument,
            SeqError::Reentrant => SeqErrorCode::ReentrantAccess,
            SeqError::Config(_) => SeqErrorCode::ConfigInvalid,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Returns true for errors whose only recovery is discarding the handle
    pub fn is_stale(&self) -> bool {
        matches!(self, SeqError::StaleHandle { .. })
    }

    /// Returns true for offset/length errors
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            SeqError::IndexOutOfRange { .. } | SeqError::RangeOutOfBounds { .. }
        )
    }
}

/// Checks `index < len`.
pub(crate) fn check_index(index: usize, len: usize) -> SeqResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(SeqError::IndexOutOfRange { index, len })
    }
}

/// Checks `index <= len`, the valid positions for an insert.
pub(crate) fn check_insert_index(index: usize, len: usize) -> SeqResult<()> {
    if index <= len {
        Ok(())
    } else {
        Err(SeqError::IndexOutOfRange { index, len })
    }
}

/// Checks that `[offset, offset + len)` lies inside a window of `window` elements.
pub(crate) fn check_range(offset: usize, len: usize, window: usize) -> SeqResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= window => Ok(()),
        _ => Err(SeqError::RangeOutOfBounds {
            offset,
            len,
            window,
        }),
    }
}
