//! Tracker fixtures.
//!
//! Helpers for building trackers in a known state.

use chrono::{DateTime, TimeZone, Utc};
use lotkeeper_core::{LotConfig, ManualClock, OccupancyRecord, OccupancyTracker, VehicleId};
use std::sync::Arc;

/// Parses a plate, panicking on blank input.
pub fn plate(raw: &str) -> VehicleId {
    VehicleId::parse(raw).expect("plate must not be blank")
}

/// Plate used by [`fill_lot`] for the `n`th vehicle.
pub fn numbered_plate(n: u32) -> VehicleId {
    plate(&format!("FILL{n:04}"))
}

/// Creates a tracker with `capacity` spots.
pub fn tracker(capacity: u32) -> OccupancyTracker {
    OccupancyTracker::with_capacity(capacity).expect("Failed to create tracker")
}

/// Fixed start time for manual clocks: 2024-01-01T08:00:00Z.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
        .single()
        .expect("valid start time")
}

/// Creates a tracker driven by a manual clock starting at [`start_time`].
pub fn tracker_with_clock(config: LotConfig) -> (OccupancyTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let tracker = OccupancyTracker::with_clock(config, Arc::clone(&clock) as _)
        .expect("Failed to create tracker");
    (tracker, clock)
}

/// Admits vehicles until the lot is full and returns their records.
pub fn fill_lot(tracker: &OccupancyTracker) -> Vec<OccupancyRecord> {
    let mut records = Vec::new();
    let mut n = 0;
    while tracker.status().available_spots > 0 {
        n += 1;
        let vehicle = numbered_plate(n);
        if tracker.lookup(&vehicle).is_some() {
            continue;
        }
        records.push(
            tracker
                .admit(vehicle, tracker.default_vehicle_type())
                .expect("lot has room"),
        );
    }
    records
}
