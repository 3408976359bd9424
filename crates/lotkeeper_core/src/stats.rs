//! Tracker statistics.
//!
//! Counters are atomic and live outside the tracker's state lock, so they can
//! be read at any time without blocking admissions or releases.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters describing tracker activity.
#[derive(Debug, Default)]
pub struct TrackerStats {
    admissions: AtomicU64,
    releases: AtomicU64,
    rejected_full: AtomicU64,
    rejected_duplicate: AtomicU64,
    rejected_not_found: AtomicU64,
    ticket_regenerations: AtomicU64,
}

impl TrackerStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    // === Increment methods (internal use) ===

    pub(crate) fn record_admission(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_full(&self) {
        self.rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_duplicate(&self) {
        self.rejected_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_not_found(&self) {
        self.rejected_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ticket_regeneration(&self) {
        self.ticket_regenerations.fetch_add(1, Ordering::Relaxed);
    }

    // === Getter methods (public API) ===

    /// Successful admissions.
    pub fn admissions(&self) -> u64 {
        self.admissions.load(Ordering::Relaxed)
    }

    /// Successful releases.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Admissions refused because the lot was full.
    pub fn rejected_full(&self) -> u64 {
        self.rejected_full.load(Ordering::Relaxed)
    }

    /// Admissions refused because the vehicle was already parked.
    pub fn rejected_duplicate(&self) -> u64 {
        self.rejected_duplicate.load(Ordering::Relaxed)
    }

    /// Releases refused because the vehicle was not parked.
    pub fn rejected_not_found(&self) -> u64 {
        self.rejected_not_found.load(Ordering::Relaxed)
    }

    /// Tickets discarded because they matched an active ticket.
    pub fn ticket_regenerations(&self) -> u64 {
        self.ticket_regenerations.load(Ordering::Relaxed)
    }

    /// Total rejected calls of any kind.
    pub fn rejections(&self) -> u64 {
        self.rejected_full() + self.rejected_duplicate() + self.rejected_not_found()
    }
}
