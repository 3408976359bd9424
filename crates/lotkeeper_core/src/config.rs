//! Lot configuration.

use crate::error::{CoreError, CoreResult};

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: u32 = 50;

/// Vehicle category recorded when the caller supplies none.
pub const DEFAULT_VEHICLE_TYPE: &str = "car";

/// Configuration for building an [`OccupancyTracker`](crate::OccupancyTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotConfig {
    /// Number of spots, numbered `1..=capacity`.
    pub capacity: u32,

    /// Maximum number of history entries kept (`None` = unbounded).
    pub history_retention: Option<usize>,

    /// Category recorded for vehicles admitted without one.
    pub default_vehicle_type: String,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            history_retention: None,
            default_vehicle_type: DEFAULT_VEHICLE_TYPE.to_string(),
        }
    }
}

impl LotConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spots.
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Bounds the history log to the most recent `entries`.
    #[must_use]
    pub const fn history_retention(mut self, entries: usize) -> Self {
        self.history_retention = Some(entries);
        self
    }

    /// Sets the category used when a vehicle is admitted without one.
    #[must_use]
    pub fn default_vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.default_vehicle_type = vehicle_type.into();
        self
    }

    /// Checks that a tracker can be built from this configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            return Err(CoreError::invalid_configuration(
                "capacity must be at least 1",
            ));
        }
        if self.history_retention == Some(0) {
            return Err(CoreError::invalid_configuration(
                "history retention must be at least 1 entry",
            ));
        }
        if self.default_vehicle_type.trim().is_empty() {
            return Err(CoreError::invalid_configuration(
                "default vehicle type must not be blank",
            ));
        }
        Ok(())
    }
}
