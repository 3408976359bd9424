//! Property-based test generators using proptest.
//!
//! Operation sequences draw plates from a small pool so that duplicate
//! admissions and releases of absent vehicles occur often.

use proptest::prelude::*;

/// Strategy for generating plates as a client might type them: mixed case,
/// with optional surrounding whitespace.
pub fn plate_strategy() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[A-Za-z0-9]{1,8}").expect("Invalid regex"),
        prop::bool::ANY,
    )
        .prop_map(|(plate, padded)| if padded { format!("  {plate} ") } else { plate })
}

/// Strategy for generating vehicle types, including blank ones.
pub fn vehicle_type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("car".to_string()),
        Just("truck".to_string()),
        Just("motorcycle".to_string()),
    ]
}

/// One operation against a tracker.
#[derive(Debug, Clone)]
pub enum LotOp {
    /// Admit a vehicle
    Park {
        /// Plate from the pool
        plate: String,
        /// Vehicle type (may be blank)
        vehicle_type: String,
    },
    /// Release a vehicle
    Exit {
        /// Plate from the pool
        plate: String,
    },
}

impl LotOp {
    /// Plate this operation targets.
    pub fn plate(&self) -> &str {
        match self {
            LotOp::Park { plate, .. } | LotOp::Exit { plate } => plate,
        }
    }
}

/// Strategy for a plate drawn from a pool of `pool_size` plates.
pub fn pooled_plate_strategy(pool_size: usize) -> impl Strategy<Value = String> {
    (0..pool_size.max(1)).prop_map(|n| format!("P{n:03}"))
}

/// Strategy for generating lot operations over a plate pool.
pub fn lot_op_strategy(pool_size: usize) -> impl Strategy<Value = LotOp> {
    prop_oneof![
        3 => (pooled_plate_strategy(pool_size), vehicle_type_strategy())
            .prop_map(|(plate, vehicle_type)| LotOp::Park { plate, vehicle_type }),
        2 => pooled_plate_strategy(pool_size).prop_map(|plate| LotOp::Exit { plate }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn lot_ops_strategy(
    pool_size: usize,
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<LotOp>> {
    prop::collection::vec(lot_op_strategy(pool_size), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
