//! Store-to-Load Forwarding Predictor.
//!
//! Predicts that a load returns the most recent value stored to the same
//! address. Unlike the other predictors it is keyed by memory address rather
//! than by program counter.

use tracing::trace;

use super::{PredictorKind, ValuePredictor};
use crate::config::StoreLoadConfig;
use crate::core::units::table::BoundedTable;
use crate::stats::TableStats;

/// Store-to-load predictor state.
#[derive(Debug, Clone)]
pub struct StoreLoadPredictor {
    /// Address to last stored value.
    table: BoundedTable<u64, u64>,
}

impl StoreLoadPredictor {
    /// Creates a store-to-load predictor.
    pub fn new(config: &StoreLoadConfig) -> Self {
        Self {
            table: BoundedTable::new(config.table_size),
        }
    }

    /// Records a store of `value` to `addr`.
    pub fn on_store(&mut self, addr: u64, value: u64) {
        if let Some((victim, old)) = self.table.put(addr, value) {
            trace!("[Evict] store addr {victim:#x} (value {old:#x}) for addr {addr:#x}");
        }
    }

    /// The bounded store value table.
    pub const fn table(&self) -> &BoundedTable<u64, u64> {
        &self.table
    }
}

impl ValuePredictor for StoreLoadPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::StoreToLoad
    }

    fn predict(&self, addr: u64) -> Option<u64> {
        self.table.get(&addr).copied()
    }

    /// Treats an observed load value as if it had been stored to `addr`.
    fn train(&mut self, addr: u64, actual: u64) {
        self.on_store(addr, actual);
    }

    fn table_stats(&self) -> TableStats {
        TableStats::of(&self.table)
    }
}
