//! # Lotkeeper Testkit
//!
//! Test utilities for Lotkeeper.
//!
//! This crate provides:
//! - Tracker fixtures with a controllable clock
//! - Property-based test generators using proptest
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use lotkeeper_testkit::prelude::*;
//!
//! let tracker = tracker(3);
//! fill_lot(&tracker);
//! assert_eq!(tracker.status().available_spots, 0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
