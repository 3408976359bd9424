//! Stress tests for the tracker.
//!
//! These verify behavior under concurrent admissions and releases.

use lotkeeper_core::{OccupancyTracker, VehicleId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Operations the tracker accepted.
    pub successful_ops: usize,
    /// Operations the tracker rejected.
    pub rejected_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, rejected: usize, duration: Duration) -> Self {
        let total = successful + rejected;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            rejected_ops: rejected,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Rejected: {}", self.rejected_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Operations per thread.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Distinct plates per thread.
    pub plates_per_thread: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 2_000,
            threads: 4,
            plates_per_thread: 16,
        }
    }
}

/// Runs admissions and releases from many threads at once.
///
/// Each thread cycles through its own plates, alternating park and exit
/// per plate. Plates are disjoint across threads, so rejections come only
/// from a full lot.
pub fn stress_concurrent_churn(
    tracker: Arc<OccupancyTracker>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));
    let plates_per_thread = config.plates_per_thread.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            let successful = Arc::clone(&successful);
            let rejected = Arc::clone(&rejected);
            let operations = config.operations;

            thread::spawn(move || {
                let plates: Vec<VehicleId> = (0..plates_per_thread)
                    .map(|p| VehicleId::parse(&format!("T{t}P{p}")).expect("valid plate"))
                    .collect();
                let mut parked = vec![false; plates_per_thread];

                for i in 0..operations {
                    let slot = i % plates_per_thread;
                    let vehicle = &plates[slot];
                    let outcome = if parked[slot] {
                        tracker.release(vehicle).map(|_| ())
                    } else {
                        tracker.admit(vehicle.clone(), "car").map(|_| ())
                    };

                    match outcome {
                        Ok(()) => {
                            parked[slot] = !parked[slot];
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            rejected.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        rejected.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
