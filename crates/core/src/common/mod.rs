//! Common utilities and types used throughout the load-value prediction simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Access widths and the missing-guess sentinel.
//! 2. **Error Handling:** The simulator error type and the per-access fault type
//!    used to drop unreadable or oversized loads.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types and access fault definitions.
pub mod error;

pub use constants::{MAX_ACCESS_BYTES, NO_PREDICTION};
pub use error::{AccessFault, SimError};
