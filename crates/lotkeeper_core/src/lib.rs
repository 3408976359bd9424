//! # Lotkeeper Core
//!
//! Spot allocation and occupancy tracking for a fixed-capacity parking lot.
//!
//! This crate provides:
//! - [`OccupancyTracker`] - the free-spot pool, active occupancy map and
//!   activity history behind a single lock
//! - Data model types ([`OccupancyRecord`], [`HistoryEntry`], [`LotStatus`])
//! - A [`Clock`] seam so durations can be tested deterministically
//! - A [`TicketSource`] seam for ticket generation and lock-free
//!   [`TrackerStats`] counters
//!
//! ## Example
//!
//! ```rust
//! use lotkeeper_core::{OccupancyTracker, Rejection, VehicleId};
//!
//! let tracker = OccupancyTracker::with_capacity(2).unwrap();
//! let abc = VehicleId::parse(" abc123 ").unwrap();
//!
//! let record = tracker.admit(abc.clone(), "car").unwrap();
//! assert_eq!(record.spot_number.get(), 1);
//! assert_eq!(tracker.admit(abc.clone(), "car"), Err(Rejection::AlreadyParked));
//!
//! let summary = tracker.release(&abc).unwrap();
//! assert_eq!(summary.spot_number.get(), 1);
//! assert_eq!(tracker.status().available_spots, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod clock;
mod config;
mod error;
mod history;
mod record;
mod stats;
mod ticket;
pub mod timestamp;
mod tracker;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LotConfig, DEFAULT_CAPACITY, DEFAULT_VEHICLE_TYPE};
pub use error::{CoreError, CoreResult, Rejection};
pub use history::HistoryLog;
pub use record::{HistoryAction, HistoryEntry, LotStatus, OccupancyRecord, ReleaseSummary};
pub use stats::TrackerStats;
pub use ticket::{RandomTickets, ScriptedTickets, TicketSource};
pub use tracker::OccupancyTracker;
pub use types::{SpotNumber, TicketId, VehicleId, TICKET_LEN};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
