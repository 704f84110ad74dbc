//! Core prediction engine implementation.
//!
//! This module contains the engine that consumes load/store events and the
//! functional units it orchestrates: bounded tables, value predictors, and
//! the confidence arbiter.

/// Load/store event handling, arbitration, training, and statistics.
pub mod engine;

/// Functional units (bounded table, value predictors, confidence arbiter).
pub mod units;

pub use self::engine::{Engine, Guesses, LoadOutcome};
