//! Load value prediction simulator library.
//!
//! This crate models CPU load-value prediction: for every load observed in a
//! program, it predicts the value before reading it back, scores the guess, and
//! adapts. It provides:
//! 1. **Units:** A bounded FIFO table, context/stride/store-to-load value
//!    predictors, and a confidence arbiter.
//! 2. **Engine:** The orchestrator that reads actual values, arbitrates, scores,
//!    and trains.
//! 3. **Simulation:** Memory sources, JSON-lines traces, synthetic workloads, and
//!    the replay driver.
//! 4. **Configuration and statistics:** Serde-backed settings and end-of-run
//!    reporting.

/// Common constants and error types.
pub mod common;
/// Simulator configuration (defaults, engine mode, per-predictor settings).
pub mod config;
/// Prediction engine and its functional units.
pub mod core;
/// Memory sources, traces, workloads, and the replay driver.
pub mod sim;
/// End-of-run statistics and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or parse JSON.
pub use crate::config::Config;
/// Load value prediction engine.
pub use crate::core::Engine;
/// Replay driver owning an engine and a memory image.
pub use crate::sim::Simulator;
/// End-of-run summary.
pub use crate::stats::Summary;
