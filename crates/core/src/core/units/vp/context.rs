//! Context-Based Load Value Predictor.
//!
//! Each program counter owns a short circular history of the last K values its
//! loads returned. The history is XOR-folded into a context key, and a bounded
//! value prediction table maps that key to the value that followed the same
//! context last time.
//!
//! The history table is unbounded in the number of program counters; only
//! the value prediction table is capacity-limited (FIFO eviction).
//!
//! Two program counters whose histories fold to the same key share a
//! prediction. XOR folding also ignores the order of the K values.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `predict()`: O(K)
//!   - `train()`: O(K)
//! - **Space Complexity:** O(P·K + T) where P is the number of distinct PCs
//!   and T the prediction table capacity
//! - **Best Case:** Loads that cycle through a short repeating value sequence
//! - **Worst Case:** Monotonic sequences (every context is new)

use std::collections::HashMap;

use tracing::trace;

use super::{PredictorKind, ValuePredictor};
use crate::config::ContextConfig;
use crate::core::units::table::BoundedTable;
use crate::stats::TableStats;

/// Circular buffer of the K most recent values observed at one PC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Value slots; `values[cursor]` is the oldest.
    values: Box<[u64]>,
    /// Next slot to overwrite, always in `[0, K)`.
    cursor: usize,
}

impl HistoryEntry {
    /// Starts a history with `first` in slot 0 and the remaining slots zeroed.
    fn new(first: u64, length: usize) -> Self {
        let mut values = vec![0; length].into_boxed_slice();
        values[0] = first;
        Self {
            values,
            cursor: 1 % length,
        }
    }

    /// Overwrites the oldest slot with `value`.
    fn push(&mut self, value: u64) {
        self.values[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.values.len();
    }

    /// XOR-folds all slots into the context key.
    pub fn context_key(&self) -> u64 {
        self.values.iter().fold(0, |acc, v| acc ^ v)
    }

    /// Raw slots in storage order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Index of the next slot to overwrite.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Slots ordered from oldest to most recent.
    pub fn chronological(&self) -> impl Iterator<Item = u64> + '_ {
        let (newer, older) = self.values.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }
}

/// Context predictor state.
#[derive(Debug, Clone)]
pub struct ContextPredictor {
    /// Per-PC value history.
    history: HashMap<u64, HistoryEntry>,
    /// Context key (or bootstrap PC) to predicted value.
    table: BoundedTable<u64, u64>,
    /// Number of values per history (K).
    history_length: usize,
}

impl ContextPredictor {
    /// Creates a context predictor.
    ///
    /// A zero history length is raised to one.
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            history: HashMap::new(),
            table: BoundedTable::new(config.table_size),
            history_length: config.history_length.max(1),
        }
    }

    /// History recorded for `pc`, if any.
    pub fn history(&self, pc: u64) -> Option<&HistoryEntry> {
        self.history.get(&pc)
    }

    /// Number of program counters with a history.
    pub fn tracked_pcs(&self) -> usize {
        self.history.len()
    }

    /// The bounded value prediction table.
    pub const fn table(&self) -> &BoundedTable<u64, u64> {
        &self.table
    }

    /// Configured history length (K).
    pub const fn history_length(&self) -> usize {
        self.history_length
    }

    /// Stores `value` under `key`, logging any eviction.
    fn record(&mut self, key: u64, value: u64) {
        if let Some((victim, old)) = self.table.put(key, value) {
            trace!(
                "[Evict] context key {victim:#x} (value {old:#x}) for key {key:#x} (value {value:#x})"
            );
        }
    }
}

impl ValuePredictor for ContextPredictor {
    fn kind(&self) -> PredictorKind {
        PredictorKind::Context
    }

    fn predict(&self, pc: u64) -> Option<u64> {
        let entry = self.history.get(&pc)?;
        self.table.get(&entry.context_key()).copied()
    }

    /// Records `actual` in the PC's history and teaches the resulting context.
    ///
    /// A first sighting seeds the table under the PC itself, since no
    /// context exists yet.
    fn train(&mut self, pc: u64, actual: u64) {
        let key = match self.history.get_mut(&pc) {
            Some(entry) => {
                entry.push(actual);
                entry.context_key()
            }
            None => {
                let _ = self
                    .history
                    .insert(pc, HistoryEntry::new(actual, self.history_length));
                pc
            }
        };
        self.record(key, actual);
    }

    fn table_stats(&self) -> TableStats {
        TableStats::of(&self.table)
    }
}
