//! Global Simulator Constants.
//!
//! This module defines constants shared by the predictors, the engine, and the driver:
//! 1. **Access Constants:** Widest load the engine will read back.
//! 2. **Prediction Constants:** The value reported when a predictor has no opinion.

/// Widest memory access, in bytes, that the engine reads back and predicts.
///
/// Loads wider than this are dropped without touching predictor state.
pub const MAX_ACCESS_BYTES: usize = 8;

/// Value that stands in for "no prediction" when guesses are compared.
///
/// A cold program counter or address predicts this value, which is
/// indistinguishable from a correct prediction of a literal zero.
pub const NO_PREDICTION: u64 = 0;
