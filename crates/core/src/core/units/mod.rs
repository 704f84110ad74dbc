//! Functional units of the prediction engine.
//!
//! 1. **Table:** Bounded associative storage with FIFO eviction.
//! 2. **VP:** Context, stride, and store-to-load value predictors.
//! 3. **Confidence:** Saturating counters and the final-prediction arbiter.

/// Confidence counters and the arbiter.
pub mod confidence;

/// Bounded table with FIFO eviction.
pub mod table;

/// Load value predictors.
pub mod vp;
