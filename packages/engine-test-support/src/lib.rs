//! Engine test support utilities
//!
//! This crate provides utilities for engine testing, currently unified
//! logging initialization shared by unit and integration tests.

pub mod test_logging;
