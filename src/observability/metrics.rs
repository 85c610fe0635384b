//! Per-tree metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - One registry per root, shared by all of its views

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing the activity of one sequence tree
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Structural edits applied (one per version bump)
    structural_edits: AtomicU64,
    /// Buffer swaps performed by capacity changes
    reallocations: AtomicU64,
    /// Operations rejected because the handle was stale
    stale_rejections: AtomicU64,
    /// Views created anywhere in the tree
    views_created: AtomicU64,
    /// Enumerators created over the root or any view
    enumerators_created: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment structural edits
    pub fn increment_structural_edits(&self) {
        self.structural_edits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment reallocations
    pub fn increment_reallocations(&self) {
        self.reallocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment stale rejections
    pub fn increment_stale_rejections(&self) {
        self.stale_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment views created
    pub fn increment_views_created(&self) {
        self.views_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment enumerators created
    pub fn increment_enumerators_created(&self) {
        self.enumerators_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"structural_edits":{},"reallocations":{},"stale_rejections":{},"views_created":{},"enumerators_created":{}}}"#,
            s.structural_edits, s.reallocations, s.stale_rejections, s.views_created, s.enumerators_created,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            structural_edits: self.structural_edits.load(Ordering::Relaxed),
            reallocations: self.reallocations.load(Ordering::Relaxed),
            stale_rejections: self.stale_rejections.load(Ordering::Relaxed),
            views_created: self.views_created.load(Ordering::Relaxed),
            enumerators_created: self.enumerators_created.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub structural_edits: u64,
    pub reallocations: u64,
    pub stale_rejections: u64,
    pub views_created: u64,
    pub enumerators_created: u64,
}
