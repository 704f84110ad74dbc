//! Stride Load Value Predictor.
//!
//! Predicts that a load returns its previous value plus the last observed
//! delta. Entries are kept per program counter in a bounded FIFO table.
//!
//! Deltas are signed 64-bit differences computed with wrapping arithmetic, so
//! sequences that cross the `u64` boundary keep predicting correctly.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `train()` are O(1)
//! - **Space Complexity:** O(T) where T is the table capacity
//! - **Best Case:** Array walks and induction variables
//! - **Worst Case:** Pointer chasing and hashed data

use tracing::trace;

use super::{PredictorKind, ValuePredictor};
use crate::config::StrideConfig;
use crate::core::units::table::BoundedTable;
use crate::stats::TableStats;

/// Entry in the stride table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StrideEntry {
    /// The last value loaded by this PC.
    pub last_value: u64,
    /// Difference between the two most recent values.
    pub stride: i64,
    /// Set once at least one value has been observed.
    pub valid: bool,
}

impl StrideEntry {
    /// Value expected next, if a baseline exists.
    pub const fn next(&self) -> Option<u64> {
        if self.valid {
            Some(self.last_value.wrapping_add_signed(self.stride))
        } else {
            None
        }
    }
}

/// Stride predictor state.
#[derive(Debug, Clone)]
pub struct StridePredictor {
    /// PC to stride entry.
    table: BoundedTable<u64, StrideEntry>,
}

impl StridePredictor {
    /// Creates a stride predictor.
    pub fn new(config: &StrideConfig) -> Self {
        Self {
            table: BoundedTable::new(config.table_size),
        }
    }

    /// Entry recorded for `pc`, if any.
    pub fn entry(&self, pc: u64) -> Option<&StrideEntry> {
        self.table.get(&pc)
    }
}

impl ValuePredictor for StridePredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::Stride
    }

    fn predict(&self, pc: u64) -> Option<u64> {
        self.table.get(&pc)?.next()
    }

    /// Updates the stride before replacing the last value.
    ///
    /// The first observation only establishes a baseline (stride 0).
    fn train(&mut self, pc: u64, actual: u64) {
        let next = match self.table.get(&pc) {
            Some(entry) if entry.valid => StrideEntry {
                last_value: actual,
                stride: actual.wrapping_sub(entry.last_value) as i64,
                valid: true,
            },
            _ => StrideEntry {
                last_value: actual,
                stride: 0,
                valid: true,
            },
        };

        if let Some((victim, _)) = self.table.put(pc, next) {
            trace!("[Evict] stride pc {victim:#x} for pc {pc:#x}");
        }
    }

    fn table_stats(&self) -> TableStats {
        TableStats::of(&self.table)
    }
}
