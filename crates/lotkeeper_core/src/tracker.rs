//! The occupancy tracker.

use crate::clock::{Clock, SystemClock};
use crate::config::LotConfig;
use crate::error::{CoreResult, Rejection};
use crate::history::HistoryLog;
use crate::record::{whole_minutes, HistoryEntry, LotStatus, OccupancyRecord, ReleaseSummary};
use crate::stats::TrackerStats;
use crate::ticket::{RandomTickets, TicketSource};
use crate::types::{SpotNumber, TicketId, VehicleId};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Mutable lot state, guarded as one unit.
///
/// Every spot in `1..=capacity` is either in `free` or assigned to exactly one
/// record in `occupied`. `tickets` mirrors the tickets of `occupied`.
struct LotState {
    free: BTreeSet<SpotNumber>,
    occupied: HashMap<VehicleId, OccupancyRecord>,
    tickets: HashSet<TicketId>,
    history: HistoryLog,
}

impl LotState {
    fn new(capacity: u32, retention: Option<usize>) -> Self {
        Self {
            free: (1..=capacity).map(SpotNumber::new).collect(),
            occupied: HashMap::new(),
            tickets: HashSet::new(),
            history: HistoryLog::with_retention(retention),
        }
    }

    fn occupied_count(&self) -> u32 {
        // Bounded by capacity, which is a u32.
        u32::try_from(self.occupied.len()).unwrap_or(u32::MAX)
    }
}

/// Tracks which spots are free, who holds the others, and what happened.
///
/// All state sits behind a single read-write lock: [`admit`](Self::admit) and
/// [`release`](Self::release) take it exclusively, queries take it shared and
/// return owned snapshots. No method performs I/O while holding the lock.
///
/// Free spots are kept sorted, so admission always assigns the lowest-numbered
/// free spot regardless of the order in which spots were released.
///
/// Share one tracker between request handlers with `Arc<OccupancyTracker>`.
pub struct OccupancyTracker {
    capacity: u32,
    default_vehicle_type: String,
    state: RwLock<LotState>,
    clock: Arc<dyn Clock>,
    ticket_source: Arc<dyn TicketSource>,
    stats: TrackerStats,
}

impl OccupancyTracker {
    /// Builds a tracker on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`](crate::CoreError) if the
    /// configuration does not validate (e.g. zero capacity).
    pub fn new(config: LotConfig) -> CoreResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds a tracker with the default configuration and `capacity` spots.
    pub fn with_capacity(capacity: u32) -> CoreResult<Self> {
        Self::new(LotConfig::new().capacity(capacity))
    }

    /// Builds a tracker that reads time from `clock`.
    pub fn with_clock(config: LotConfig, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        config.validate()?;
        debug!(
            capacity = config.capacity,
            retention = ?config.history_retention,
            "creating occupancy tracker"
        );
        Ok(Self {
            capacity: config.capacity,
            state: RwLock::new(LotState::new(config.capacity, config.history_retention)),
            default_vehicle_type: config.default_vehicle_type,
            clock,
            ticket_source: Arc::new(RandomTickets),
            stats: TrackerStats::new(),
        })
    }

    /// Replaces the source of ticket identifiers.
    #[must_use]
    pub fn with_ticket_source(mut self, source: Arc<dyn TicketSource>) -> Self {
        self.ticket_source = source;
        self
    }

    /// Returns the number of spots.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the category recorded when none is given.
    #[must_use]
    pub fn default_vehicle_type(&self) -> &str {
        &self.default_vehicle_type
    }

    /// Returns the activity counters.
    #[must_use]
    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    /// Admits a vehicle into the lowest-numbered free spot.
    ///
    /// A blank `vehicle_type` is replaced by the configured default.
    ///
    /// # Errors
    ///
    /// - [`Rejection::LotFull`] if no spot is free
    /// - [`Rejection::AlreadyParked`] if the vehicle holds an active record
    ///
    /// The tracker is unchanged when a rejection is returned.
    pub fn admit(&self, vehicle: VehicleId, vehicle_type: &str) -> Result<OccupancyRecord, Rejection> {
        let mut state = self.state.write();

        if state.free.is_empty() {
            self.stats.record_rejected_full();
            debug!(plate = %vehicle, "admission rejected: lot full");
            return Err(Rejection::LotFull);
        }
        if state.occupied.contains_key(&vehicle) {
            self.stats.record_rejected_duplicate();
            debug!(plate = %vehicle, "admission rejected: already parked");
            return Err(Rejection::AlreadyParked);
        }

        let Some(spot_number) = state.free.pop_first() else {
            return Err(Rejection::LotFull);
        };
        let ticket_id = self.fresh_ticket(&state.tickets);
        let vehicle_type = match vehicle_type.trim() {
            "" => self.default_vehicle_type.clone(),
            given => given.to_string(),
        };

        let record = OccupancyRecord {
            spot_number,
            ticket_id: ticket_id.clone(),
            vehicle_type,
            entry_time: self.clock.now(),
            license_plate: vehicle.clone(),
        };

        state.tickets.insert(ticket_id);
        state.history.append(HistoryEntry::entry(&record));
        state.occupied.insert(vehicle, record.clone());
        self.stats.record_admission();

        debug!(
            plate = %record.license_plate,
            spot = %record.spot_number,
            ticket = %record.ticket_id,
            "vehicle admitted"
        );
        Ok(record)
    }

    /// Releases a parked vehicle and frees its spot.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::NotFound`] if the vehicle holds no active record.
    pub fn release(&self, vehicle: &VehicleId) -> Result<ReleaseSummary, Rejection> {
        let mut state = self.state.write();

        let Some(record) = state.occupied.remove(vehicle) else {
            self.stats.record_rejected_not_found();
            debug!(plate = %vehicle, "release rejected: not found");
            return Err(Rejection::NotFound);
        };

        let exit_time = self.clock.now();
        let duration_minutes = whole_minutes(record.entry_time, exit_time);

        state.free.insert(record.spot_number);
        state.tickets.remove(&record.ticket_id);
        state
            .history
            .append(HistoryEntry::exit(&record, exit_time, duration_minutes));
        self.stats.record_release();

        debug!(
            plate = %record.license_plate,
            spot = %record.spot_number,
            duration_minutes,
            "vehicle released"
        );
        Ok(ReleaseSummary {
            spot_number: record.spot_number,
            duration_minutes,
            exit_time,
        })
    }

    /// Returns capacity, free and occupied counts, and the occupancy rate.
    #[must_use]
    pub fn status(&self) -> LotStatus {
        let state = self.state.read();
        LotStatus::new(self.capacity, state.occupied_count())
    }

    /// Returns a snapshot of all active records, ordered by spot number.
    #[must_use]
    pub fn list_occupied(&self) -> Vec<OccupancyRecord> {
        let mut records: Vec<OccupancyRecord> =
            self.state.read().occupied.values().cloned().collect();
        records.sort_by_key(|r| r.spot_number);
        records
    }

    /// Returns a snapshot of one vehicle's active record.
    #[must_use]
    pub fn lookup(&self, vehicle: &VehicleId) -> Option<OccupancyRecord> {
        self.state.read().occupied.get(vehicle).cloned()
    }

    /// Returns a snapshot of the free spots in ascending order.
    #[must_use]
    pub fn free_spots(&self) -> Vec<SpotNumber> {
        self.state.read().free.iter().copied().collect()
    }

    /// Returns the last `limit` history entries, oldest first.
    #[must_use]
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.state.read().history.recent(limit)
    }

    /// Returns the number of retained history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    /// Draws tickets until one is not held by an active record.
    fn fresh_ticket(&self, active: &HashSet<TicketId>) -> TicketId {
        loop {
            let ticket = self.ticket_source.next_ticket();
            if !active.contains(&ticket) {
                return ticket;
            }
            self.stats.record_ticket_regeneration();
            debug!(ticket = %ticket, "ticket collided with an active ticket, regenerating");
        }
    }
}

impl fmt::Debug for OccupancyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status();
        f.debug_struct("OccupancyTracker")
            .field("capacity", &self.capacity)
            .field("available", &status.available_spots)
            .field("occupied", &status.occupied_spots)
            .finish_non_exhaustive()
    }
}
