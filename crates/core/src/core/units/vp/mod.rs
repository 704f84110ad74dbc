//! Load value predictor (VP) implementations.
//!
//! This module contains the three value prediction strategies composed by the
//! hybrid engine: a context (value history) predictor, a stride predictor, and
//! a store-to-load forwarding predictor. All of them implement [`ValuePredictor`].

use std::fmt;

use serde::Serialize;

use crate::stats::TableStats;

/// Context-based predictor (XOR-folded value history per PC).
pub mod context;

/// Stride predictor (last value plus last delta per PC).
pub mod stride;

/// Store-to-load forwarding predictor (last stored value per address).
pub mod store_load;

pub use self::context::{ContextPredictor, HistoryEntry};
pub use self::store_load::StoreLoadPredictor;
pub use self::stride::{StrideEntry, StridePredictor};

/// Identity of a value predictor.
///
/// Used to index per-predictor arrays (confidence, usage) in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictorKind {
    /// Value history (context) predictor.
    Context,
    /// Stride predictor.
    Stride,
    /// Store-to-load forwarding predictor.
    StoreToLoad,
}

impl PredictorKind {
    /// Number of predictor identities.
    pub const COUNT: usize = 3;

    /// Every predictor identity, in index order.
    pub const ALL: [Self; Self::COUNT] = [Self::Context, Self::Stride, Self::StoreToLoad];

    /// Position of this predictor in per-predictor arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Context => 0,
            Self::Stride => 1,
            Self::StoreToLoad => 2,
        }
    }

    /// Short name used in logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Stride => "stride",
            Self::StoreToLoad => "store-to-load",
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for load value predictor implementations.
///
/// A predictor is queried with a key (a program counter or a memory address,
/// depending on the strategy) before the load completes, then trained with
/// the value the load actually returned.
pub trait ValuePredictor {
    /// Identity of this predictor.
    fn kind(&self) -> PredictorKind;

    /// Predicts the value for `key`.
    ///
    /// # Returns
    ///
    /// `None` if the predictor has never seen `key` (or cannot derive a value
    /// for it yet).
    fn predict(&self, key: u64) -> Option<u64>;

    /// Trains the predictor with the value actually observed for `key`.
    fn train(&mut self, key: u64, actual: u64);

    /// Occupancy and eviction counters of the predictor's bounded table.
    fn table_stats(&self) -> TableStats;
}
