//! Confidence Arbiter.
//!
//! Keeps one saturating confidence counter per predictor and picks which
//! predictor's guess becomes the engine's final prediction.
//!
//! Confidence is global per predictor, not per program counter: it reflects
//! aggregate trust in a strategy across the whole run.
//!
//! Selection follows a fixed priority order:
//! 1. **Context** if its confidence is strictly above both others and above
//!    the threshold.
//! 2. **Store-to-load** if its confidence is at least the context confidence,
//!    strictly above the stride confidence, and above the threshold. Ties with
//!    context therefore go to store-to-load.
//! 3. **Stride** otherwise, even below the threshold.

use serde::Serialize;

use super::vp::PredictorKind;
use crate::config::ConfidenceConfig;

/// Saturating counter in `[0, cap]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceCounter {
    /// Current score.
    value: u8,
    /// Saturation ceiling.
    cap: u8,
}

impl ConfidenceCounter {
    /// Creates a counter at zero.
    pub const fn new(cap: u8) -> Self {
        Self { value: 0, cap }
    }

    /// Current score.
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Increments, saturating at the cap.
    pub fn reward(&mut self) {
        if self.value < self.cap {
            self.value += 1;
        }
    }

    /// Subtracts `penalty`, clamping at zero.
    pub const fn penalize(&mut self, penalty: u8) {
        self.value = self.value.saturating_sub(penalty);
    }
}

/// Final prediction chosen by the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Value predicted by the winner.
    pub value: u64,
    /// Predictor whose guess was selected.
    pub winner: PredictorKind,
}

/// Confidence arbiter state.
#[derive(Debug, Clone)]
pub struct ConfidenceArbiter {
    /// One counter per predictor, indexed by [`PredictorKind::index`].
    counters: [ConfidenceCounter; PredictorKind::COUNT],
    /// Number of times each predictor was selected.
    usage: [u64; PredictorKind::COUNT],
    /// Amount subtracted on a misprediction.
    penalty: u8,
    /// Confidence a non-fallback predictor must exceed.
    threshold: u8,
}

impl ConfidenceArbiter {
    /// Creates an arbiter with every counter at zero.
    pub fn new(config: &ConfidenceConfig) -> Self {
        Self {
            counters: [ConfidenceCounter::new(config.cap); PredictorKind::COUNT],
            usage: [0; PredictorKind::COUNT],
            penalty: config.penalty,
            threshold: config.threshold,
        }
    }

    /// Current confidence of `kind`.
    pub const fn confidence(&self, kind: PredictorKind) -> u8 {
        self.counters[kind.index()].value()
    }

    /// Number of times `kind` has been selected.
    pub const fn usage(&self, kind: PredictorKind) -> u64 {
        self.usage[kind.index()]
    }

    /// Scores `kind`'s own guess against the actual value.
    ///
    /// A correct guess rewards the counter; a wrong one applies the penalty.
    pub fn update_confidence(&mut self, kind: PredictorKind, predicted: u64, actual: u64) {
        let counter = &mut self.counters[kind.index()];
        if predicted == actual {
            counter.reward();
        } else {
            counter.penalize(self.penalty);
        }
    }

    /// Picks the final prediction among the three guesses.
    ///
    /// Counts one use for the winner.
    pub fn select(&mut self, context: u64, store_load: u64, stride: u64) -> Selection {
        let ctx = self.confidence(PredictorKind::Context);
        let st = self.confidence(PredictorKind::StoreToLoad);
        let sd = self.confidence(PredictorKind::Stride);

        let selection = if ctx > sd && ctx > st && ctx > self.threshold {
            Selection {
                value: context,
                winner: PredictorKind::Context,
            }
        } else if st >= ctx && st > sd && st > self.threshold {
            Selection {
                value: store_load,
                winner: PredictorKind::StoreToLoad,
            }
        } else {
            Selection {
                value: stride,
                winner: PredictorKind::Stride,
            }
        };

        self.record_use(selection.winner);
        selection
    }

    /// Counts one use of `kind` without arbitration.
    ///
    /// Used when the engine runs a single predictor.
    pub const fn record_use(&mut self, kind: PredictorKind) {
        self.usage[kind.index()] += 1;
    }
}
