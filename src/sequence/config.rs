//! Sequence configuration and capacity policy
//!
//! The capacity policy decides buffer sizes only. It never touches the
//! version counter or the logical element count, so nothing it decides
//! can invalidate a view or an enumerator.
//!
//! Defaults: doubling growth from a minimum of 4 slots, exact-fit trim.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{SeqError, SeqResult};

/// Growth and shrink policy for the backing buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityManager {
    /// Smallest non-zero capacity the buffer grows to.
    #[serde(default = "default_min_capacity")]
    pub min_capacity: usize,
    /// Multiplier applied to the current capacity on growth.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: usize,
    /// `trim_excess` reallocates only when `count` is below this percentage
    /// of the current capacity. 100 means exact fit.
    #[serde(default = "default_trim_threshold_percent")]
    pub trim_threshold_percent: u8,
}

fn default_min_capacity() -> usize {
    4
}
fn default_growth_factor() -> usize {
    2
}
fn default_trim_threshold_percent() -> u8 {
    100
}

impl Default for CapacityManager {
    fn default() -> Self {
        Self {
            min_capacity: default_min_capacity(),
            growth_factor: default_growth_factor(),
            trim_threshold_percent: default_trim_threshold_percent(),
        }
    }
}

impl CapacityManager {
    /// Policy that grows to exactly the required size.
    pub fn exact() -> Self {
        Self {
            min_capacity: 0,
            growth_factor: 1,
            trim_threshold_percent: 100,
        }
    }

    /// Capacity to grow to so that `required` elements fit.
    ///
    /// Returns `None` when `current` already suffices.
    pub fn grown_capacity(&self, current: usize, required: usize) -> Option<usize> {
        if required <= current {
            return None;
        }
        let doubled = current.saturating_mul(self.growth_factor.max(1));
        Some(required.max(doubled).max(self.min_capacity))
    }

    /// Capacity an explicit request resolves to.
    ///
    /// Requests below `count` are normalized up to `count`. Returns `None`
    /// when the result equals `current`.
    pub fn requested_capacity(&self, requested: usize, count: usize, current: usize) -> Option<usize> {
        let target = requested.max(count);
        (target != current).then_some(target)
    }

    /// Capacity `trim_excess` shrinks to, if any.
    pub fn trimmed_capacity(&self, count: usize, current: usize) -> Option<usize> {
        if count >= current {
            return None;
        }
        let percent = usize::from(self.trim_threshold_percent.min(100));
        let below_threshold = count.saturating_mul(100) < current.saturating_mul(percent);
        below_threshold.then_some(count)
    }

    /// Validate policy values
    pub fn validate(&self) -> SeqResult<()> {
        if self.growth_factor == 0 {
            return Err(SeqError::config_error("growth_factor must be >= 1"));
        }
        if self.trim_threshold_percent == 0 || self.trim_threshold_percent > 100 {
            return Err(SeqError::config_error(format!(
                "trim_threshold_percent must be in 1..=100, got {}",
                self.trim_threshold_percent
            )));
        }
        Ok(())
    }
}

/// Construction-time configuration for a root sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Slots allocated up front.
    #[serde(default)]
    pub initial_capacity: usize,
    /// Buffer growth/shrink policy.
    #[serde(default)]
    pub capacity: CapacityManager,
}

impl SequenceConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> SeqResult<Self> {
        let config: SequenceConfig = serde_json::from_str(content)
            .map_err(|e| SeqError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> SeqResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SeqError::config_error(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Validate configuration
    pub fn validate(&self) -> SeqResult<()> {
        self.capacity.validate()
    }
}
