//! Prediction Engine.
//!
//! The engine is the sole owner of all predictor state. For every load it:
//! 1. **Reads:** Fetches the actual value through the collaborator's safe-copy
//!    primitive, dropping oversized or unreadable accesses.
//! 2. **Predicts:** Queries each active predictor using state as of just before
//!    this load.
//! 3. **Arbitrates:** Lets the confidence arbiter pick the final value (hybrid
//!    mode) or takes the single active predictor's guess.
//! 4. **Scores:** Compares the final value with the actual one for the run's
//!    statistics, and each predictor's own guess for its confidence.
//! 5. **Trains:** Feeds the actual value to the PC-keyed predictors.
//!
//! Stores only update the store-to-load table.

use serde::Serialize;
use tracing::{debug, trace};

use super::units::confidence::{ConfidenceArbiter, Selection};
use super::units::vp::{
    ContextPredictor, PredictorKind, StoreLoadPredictor, StridePredictor, ValuePredictor,
};
use crate::common::constants::{MAX_ACCESS_BYTES, NO_PREDICTION};
use crate::common::error::AccessFault;
use crate::config::{Config, EngineMode};
use crate::sim::memory::MemorySource;
use crate::stats::{EngineStats, PredictorReport, Summary};

/// Independent guesses of each predictor for one load.
///
/// `None` means the predictor was inactive or had nothing for the key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Guesses {
    /// Context predictor guess.
    pub context: Option<u64>,
    /// Stride predictor guess.
    pub stride: Option<u64>,
    /// Store-to-load predictor guess.
    pub store_load: Option<u64>,
}

impl Guesses {
    /// Guess made by `kind`.
    pub const fn get(&self, kind: PredictorKind) -> Option<u64> {
        match kind {
            PredictorKind::Context => self.context,
            PredictorKind::Stride => self.stride,
            PredictorKind::StoreToLoad => self.store_load,
        }
    }
}

/// Result of one processed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    /// Program counter of the load.
    pub pc: u64,
    /// Effective address of the load.
    pub addr: u64,
    /// Value read back from memory.
    pub actual: u64,
    /// Final (arbitrated) prediction.
    pub predicted: u64,
    /// Predictor that supplied the final prediction.
    pub winner: PredictorKind,
    /// Each predictor's own guess.
    pub guesses: Guesses,
}

impl LoadOutcome {
    /// Returns `true` if the final prediction matched the actual value.
    pub const fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// Load value prediction engine.
#[derive(Debug, Clone)]
pub struct Engine {
    mode: EngineMode,
    max_access_bytes: usize,
    context: ContextPredictor,
    stride: StridePredictor,
    store_load: StoreLoadPredictor,
    arbiter: ConfidenceArbiter,
    stats: EngineStats,
}

impl Engine {
    /// Creates an engine with empty tables and zeroed counters.
    ///
    /// The configuration is expected to be validated; out-of-range widths are
    /// clamped to [`MAX_ACCESS_BYTES`].
    pub fn new(config: &Config) -> Self {
        Self {
            mode: config.engine.mode,
            max_access_bytes: config.engine.max_access_bytes.min(MAX_ACCESS_BYTES),
            context: ContextPredictor::new(&config.context),
            stride: StridePredictor::new(&config.stride),
            store_load: StoreLoadPredictor::new(&config.store_load),
            arbiter: ConfidenceArbiter::new(&config.confidence),
            stats: EngineStats::default(),
        }
    }

    /// Handles one executed load.
    ///
    /// # Arguments
    ///
    /// * `mem` - Safe-copy collaborator used to read the actual value.
    /// * `pc` - Program counter of the load instruction.
    /// * `addr` - Effective address.
    /// * `size` - Access width in bytes.
    ///
    /// # Returns
    ///
    /// The processed outcome, or `None` if the access was dropped (too wide
    /// or unreadable). Dropped loads change no predictor state and no hit/miss
    /// counters.
    pub fn on_load<M>(&mut self, mem: &M, pc: u64, addr: u64, size: usize) -> Option<LoadOutcome>
    where
        M: MemorySource + ?Sized,
    {
        let actual = match self.read_actual(mem, addr, size) {
            Ok(value) => value,
            Err(fault) => {
                debug!("dropping load at pc {pc:#x}: {fault}");
                match fault {
                    AccessFault::UnsupportedWidth { .. } => self.stats.skipped_oversized += 1,
                    AccessFault::Unreadable { .. } => self.stats.skipped_unreadable += 1,
                }
                return None;
            }
        };

        let guesses = self.guesses(pc, addr);
        let selection = self.arbitrate(&guesses);

        for &kind in self.active_kinds() {
            let own = guesses.get(kind).unwrap_or(NO_PREDICTION);
            self.arbiter.update_confidence(kind, own, actual);
        }

        self.train(pc, addr, actual);

        let outcome = LoadOutcome {
            pc,
            addr,
            actual,
            predicted: selection.value,
            winner: selection.winner,
            guesses,
        };

        self.stats.total_loads += 1;
        if outcome.is_correct() {
            self.stats.correct_predictions += 1;
        } else {
            self.stats.incorrect_predictions += 1;
        }

        trace!(
            "PC: {pc:#x} | Addr: {addr:#x} | Predicted: {:#x} ({}) | Actual: {actual:#x}",
            outcome.predicted, outcome.winner
        );
        Some(outcome)
    }

    /// Handles one executed store whose value is known.
    ///
    /// Only the store-to-load predictor observes stores; it is skipped in
    /// modes that do not use it.
    pub fn on_store(&mut self, addr: u64, value: u64) {
        self.stats.stores_observed += 1;
        if matches!(self.mode, EngineMode::Hybrid | EngineMode::StoreToLoad) {
            self.store_load.on_store(addr, value);
        }
    }

    /// Read-only summary of the run so far.
    pub fn summary(&self) -> Summary {
        let predictors = self
            .active_kinds()
            .iter()
            .map(|&kind| PredictorReport {
                kind,
                usage: self.arbiter.usage(kind),
                confidence: self.arbiter.confidence(kind),
                table: self.predictor(kind).table_stats(),
            })
            .collect();

        Summary {
            mode: self.mode,
            hit_rate: self.stats.hit_rate(),
            loads: self.stats.clone(),
            context_histories: self.context.tracked_pcs(),
            predictors,
        }
    }

    /// Prediction strategy in use.
    pub const fn mode(&self) -> EngineMode {
        self.mode
    }

    /// Load and store counters.
    pub const fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Confidence counters and usage.
    pub const fn arbiter(&self) -> &ConfidenceArbiter {
        &self.arbiter
    }

    /// Context predictor state.
    pub const fn context(&self) -> &ContextPredictor {
        &self.context
    }

    /// Stride predictor state.
    pub const fn stride(&self) -> &StridePredictor {
        &self.stride
    }

    /// Store-to-load predictor state.
    pub const fn store_load(&self) -> &StoreLoadPredictor {
        &self.store_load
    }

    /// Predictors consulted in the current mode.
    fn active_kinds(&self) -> &'static [PredictorKind] {
        match self.mode {
            EngineMode::Hybrid => &PredictorKind::ALL,
            EngineMode::Context => &[PredictorKind::Context],
            EngineMode::Stride => &[PredictorKind::Stride],
            EngineMode::StoreToLoad => &[PredictorKind::StoreToLoad],
        }
    }

    fn predictor(&self, kind: PredictorKind) -> &dyn ValuePredictor {
        match kind {
            PredictorKind::Context => &self.context,
            PredictorKind::Stride => &self.stride,
            PredictorKind::StoreToLoad => &self.store_load,
        }
    }

    /// Reads `size` bytes at `addr` as a little-endian, zero-extended value.
    fn read_actual<M>(&self, mem: &M, addr: u64, size: usize) -> Result<u64, AccessFault>
    where
        M: MemorySource + ?Sized,
    {
        if size == 0 || size > self.max_access_bytes {
            return Err(AccessFault::UnsupportedWidth {
                size,
                max: self.max_access_bytes,
            });
        }

        let mut buf = [0u8; MAX_ACCESS_BYTES];
        let copied = mem.safe_copy(addr, &mut buf[..size]);
        if copied != size {
            return Err(AccessFault::Unreadable { addr, copied, size });
        }
        Ok(u64::from_le_bytes(buf))
    }

    fn guesses(&self, pc: u64, addr: u64) -> Guesses {
        let active = self.active_kinds();
        let wants = |kind| active.contains(&kind);
        Guesses {
            context: wants(PredictorKind::Context)
                .then(|| self.context.predict(pc))
                .flatten(),
            stride: wants(PredictorKind::Stride)
                .then(|| self.stride.predict(pc))
                .flatten(),
            store_load: wants(PredictorKind::StoreToLoad)
                .then(|| self.store_load.predict(addr))
                .flatten(),
        }
    }

    fn arbitrate(&mut self, guesses: &Guesses) -> Selection {
        let single = |kind: PredictorKind| Selection {
            value: guesses.get(kind).unwrap_or(NO_PREDICTION),
            winner: kind,
        };

        let selection = match self.mode {
            EngineMode::Hybrid => {
                return self.arbiter.select(
                    guesses.context.unwrap_or(NO_PREDICTION),
                    guesses.store_load.unwrap_or(NO_PREDICTION),
                    guesses.stride.unwrap_or(NO_PREDICTION),
                );
            }
            EngineMode::Context => single(PredictorKind::Context),
            EngineMode::Stride => single(PredictorKind::Stride),
            EngineMode::StoreToLoad => single(PredictorKind::StoreToLoad),
        };
        self.arbiter.record_use(selection.winner);
        selection
    }

    /// Trains every active predictor with the value the load returned.
    ///
    /// In hybrid mode the store-to-load table learns only from stores.
    fn train(&mut self, pc: u64, addr: u64, actual: u64) {
        match self.mode {
            EngineMode::Hybrid => {
                self.context.train(pc, actual);
                self.stride.train(pc, actual);
            }
            EngineMode::Context => self.context.train(pc, actual),
            EngineMode::Stride => self.stride.train(pc, actual),
            EngineMode::StoreToLoad => self.store_load.train(addr, actual),
        }
    }
}
