//! Model-based checks of the tracker against a plain reference model.

use lotkeeper_core::{HistoryAction, LotConfig, Rejection, SpotNumber, VehicleId};
use lotkeeper_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Reference model: free spots and who holds which spot.
struct Model {
    free: BTreeSet<u32>,
    parked: HashMap<String, u32>,
    entries: usize,
    exits: usize,
}

impl Model {
    fn new(capacity: u32) -> Self {
        Self {
            free: (1..=capacity).collect(),
            parked: HashMap::new(),
            entries: 0,
            exits: 0,
        }
    }

    fn park(&mut self, plate: &str) -> Result<u32, Rejection> {
        if self.free.is_empty() {
            return Err(Rejection::LotFull);
        }
        if self.parked.contains_key(plate) {
            return Err(Rejection::AlreadyParked);
        }
        let spot = self.free.pop_first().ok_or(Rejection::LotFull)?;
        self.parked.insert(plate.to_string(), spot);
        self.entries += 1;
        Ok(spot)
    }

    fn exit(&mut self, plate: &str) -> Result<u32, Rejection> {
        let spot = self.parked.remove(plate).ok_or(Rejection::NotFound)?;
        self.free.insert(spot);
        self.exits += 1;
        Ok(spot)
    }
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn tracker_matches_model(
        capacity in 1u32..8,
        ops in lot_ops_strategy(10, 1, 120),
    ) {
        let (tracker, _clock) = tracker_with_clock(LotConfig::new().capacity(capacity));
        let mut model = Model::new(capacity);

        for op in &ops {
            let vehicle = plate(op.plate());
            match op {
                LotOp::Park { plate, vehicle_type } => {
                    let expected = model.park(plate);
                    let actual = tracker.admit(vehicle, vehicle_type);
                    match (expected, actual) {
                        (Ok(spot), Ok(record)) => {
                            prop_assert_eq!(record.spot_number, SpotNumber::new(spot));
                            let want = if vehicle_type.is_empty() { "car" } else { vehicle_type.as_str() };
                            prop_assert_eq!(record.vehicle_type.as_str(), want);
                        }
                        (Err(want), Err(got)) => prop_assert_eq!(want, got),
                        (want, got) => prop_assert!(false, "model {:?} vs tracker {:?}", want, got),
                    }
                }
                LotOp::Exit { plate } => {
                    let expected = model.exit(plate);
                    let actual = tracker.release(&vehicle);
                    match (expected, actual) {
                        (Ok(spot), Ok(summary)) => {
                            prop_assert_eq!(summary.spot_number, SpotNumber::new(spot));
                            prop_assert_eq!(summary.duration_minutes, 0);
                        }
                        (Err(want), Err(got)) => prop_assert_eq!(want, got),
                        (want, got) => prop_assert!(false, "model {:?} vs tracker {:?}", want, got),
                    }
                }
            }

            let status = tracker.status();
            prop_assert_eq!(status.total_spots, capacity);
            prop_assert_eq!(status.available_spots + status.occupied_spots, capacity);
            prop_assert_eq!(status.occupied_spots as usize, model.parked.len());

            let free: Vec<u32> = tracker.free_spots().into_iter().map(SpotNumber::get).collect();
            let model_free: Vec<u32> = model.free.iter().copied().collect();
            prop_assert_eq!(free, model_free);
        }

        let occupied = tracker.list_occupied();
        let spots: Vec<u32> = occupied.iter().map(|r| r.spot_number.get()).collect();
        let mut sorted = spots.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(&spots, &sorted);

        let history = tracker.recent_history(usize::MAX);
        prop_assert_eq!(history.len(), model.entries + model.exits);
        let entries = history.iter().filter(|e| e.action == HistoryAction::Entry).count();
        prop_assert_eq!(entries, model.entries);
    }

    #[test]
    fn tickets_unique_among_active(ops in lot_ops_strategy(20, 1, 80)) {
        let tracker = tracker(20);
        for op in &ops {
            let vehicle = plate(op.plate());
            match op {
                LotOp::Park { vehicle_type, .. } => { let _ = tracker.admit(vehicle, vehicle_type); }
                LotOp::Exit { .. } => { let _ = tracker.release(&vehicle); }
            }
        }
        let records = tracker.list_occupied();
        let tickets: BTreeSet<String> =
            records.iter().map(|r| r.ticket_id.as_str().to_string()).collect();
        prop_assert_eq!(tickets.len(), records.len());
    }

    #[test]
    fn lookup_agrees_with_list(ops in lot_ops_strategy(6, 1, 60)) {
        let tracker = tracker(4);
        for op in &ops {
            let vehicle = plate(op.plate());
            match op {
                LotOp::Park { vehicle_type, .. } => { let _ = tracker.admit(vehicle, vehicle_type); }
                LotOp::Exit { .. } => { let _ = tracker.release(&vehicle); }
            }
        }
        for record in tracker.list_occupied() {
            let found = tracker.lookup(&record.license_plate);
            prop_assert_eq!(found.as_ref(), Some(&record));
        }
        let absent = VehicleId::parse("NOT-IN-POOL").unwrap();
        prop_assert!(tracker.lookup(&absent).is_none());
    }
}

#[test]
fn retention_bounds_history() {
    let (tracker, _clock) = tracker_with_clock(LotConfig::new().capacity(3).history_retention(4));
    fill_lot(&tracker);
    for record in tracker.list_occupied() {
        tracker.release(&record.license_plate).unwrap();
    }
    assert_eq!(tracker.history_len(), 4);
    let history = tracker.recent_history(10);
    assert_eq!(history.first().unwrap().action, HistoryAction::Entry);
    assert!(history[1..].iter().all(|e| e.action == HistoryAction::Exit));
}

#[test]
fn concurrent_churn_keeps_books_balanced() {
    let tracker = Arc::new(tracker(10));
    let config = StressConfig {
        operations: 1_000,
        threads: 8,
        plates_per_thread: 4,
    };

    let result = stress_concurrent_churn(Arc::clone(&tracker), &config);
    result.print_summary("concurrent churn");
    assert_eq!(result.total_ops, 8_000);

    let status = tracker.status();
    assert_eq!(status.occupied_spots + status.available_spots, 10);

    let stats = tracker.stats();
    assert_eq!(
        stats.admissions() - stats.releases(),
        u64::from(status.occupied_spots)
    );
    assert_eq!(
        tracker.history_len() as u64,
        stats.admissions() + stats.releases()
    );
}
