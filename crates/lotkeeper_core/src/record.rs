//! Records produced by the tracker.
//!
//! Field names are the JSON names served by the API.

use crate::types::{SpotNumber, TicketId, VehicleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active occupancy: one vehicle holding one spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    /// Assigned spot.
    pub spot_number: SpotNumber,
    /// Ticket issued on admission.
    pub ticket_id: TicketId,
    /// Free-form vehicle category.
    pub vehicle_type: String,
    /// When the vehicle was admitted.
    #[serde(with = "crate::timestamp")]
    pub entry_time: DateTime<Utc>,
    /// Normalized plate.
    pub license_plate: VehicleId,
}

/// Kind of history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    /// A vehicle was admitted.
    Entry,
    /// A vehicle was released.
    Exit,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// What happened.
    pub action: HistoryAction,
    /// Vehicle involved.
    pub license_plate: VehicleId,
    /// Spot involved.
    pub spot_number: SpotNumber,
    /// Ticket of the occupancy.
    pub ticket_id: TicketId,
    /// When it happened.
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Length of stay, on exit entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u64>,
}

impl HistoryEntry {
    /// Builds the entry logged when `record` is admitted.
    pub fn entry(record: &OccupancyRecord) -> Self {
        Self {
            action: HistoryAction::Entry,
            license_plate: record.license_plate.clone(),
            spot_number: record.spot_number,
            ticket_id: record.ticket_id.clone(),
            timestamp: record.entry_time,
            duration_minutes: None,
        }
    }

    /// Builds the entry logged when `record` is released at `exit_time`.
    pub fn exit(record: &OccupancyRecord, exit_time: DateTime<Utc>, duration_minutes: u64) -> Self {
        Self {
            action: HistoryAction::Exit,
            license_plate: record.license_plate.clone(),
            spot_number: record.spot_number,
            ticket_id: record.ticket_id.clone(),
            timestamp: exit_time,
            duration_minutes: Some(duration_minutes),
        }
    }
}

/// Result of a successful release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    /// Spot that was freed.
    pub spot_number: SpotNumber,
    /// Whole minutes between entry and exit.
    pub duration_minutes: u64,
    /// When the vehicle left.
    #[serde(with = "crate::timestamp")]
    pub exit_time: DateTime<Utc>,
}

/// Aggregate view of the lot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotStatus {
    /// Capacity.
    pub total_spots: u32,
    /// Free spots.
    pub available_spots: u32,
    /// Occupied spots.
    pub occupied_spots: u32,
    /// Occupied share of capacity in percent, one decimal place.
    pub occupancy_rate: f64,
}

impl LotStatus {
    /// Derives the status of a lot with `occupied` of `total` spots taken.
    #[must_use]
    pub fn new(total: u32, occupied: u32) -> Self {
        let occupancy_rate = if total == 0 {
            0.0
        } else {
            let percent = f64::from(occupied) / f64::from(total) * 100.0;
            (percent * 10.0).round() / 10.0
        };
        Self {
            total_spots: total,
            available_spots: total.saturating_sub(occupied),
            occupied_spots: occupied,
            occupancy_rate,
        }
    }
}

/// Whole minutes from `entry` to `exit`, never negative.
pub(crate) fn whole_minutes(entry: DateTime<Utc>, exit: DateTime<Utc>) -> u64 {
    let seconds = (exit - entry).num_seconds().max(0);
    // `seconds` is non-negative, so the cast is lossless.
    (seconds as u64) / 60
}
