//! Tick loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TickError;

/// What the tick loop does when a per-entity update fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the failure, record it in the frame report and keep going.
    #[default]
    Skip,
    /// Stop the frame and return the failure to the caller.
    Abort,
}

/// Configuration for the tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// Handling of failed updates.
    pub failure_policy: FailurePolicy,
}

impl TickConfig {
    /// Check that the configuration can drive a loop.
    ///
    /// # Errors
    ///
    /// [`TickError::InvalidTickRate`] unless `tick_rate` is positive, finite
    /// and yields a representable tick duration.
    pub fn validate(&self) -> Result<(), TickError> {
        self.tick_duration().map(|_| ())
    }

    /// Wall-clock budget of one tick.
    ///
    /// # Errors
    ///
    /// See [`TickConfig::validate`].
    pub fn tick_duration(&self) -> Result<Duration, TickError> {
        let invalid = TickError::InvalidTickRate(self.tick_rate);
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(invalid);
        }
        Duration::try_from_secs_f64(1.0 / self.tick_rate).map_err(|_| invalid)
    }

    /// Fixed delta time of one tick, in seconds.
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        (1.0 / self.tick_rate) as f32
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            failure_policy: FailurePolicy::Skip,
        }
    }
}
