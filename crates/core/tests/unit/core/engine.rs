//! Prediction Engine Tests.
//!
//! End-to-end checks of the load path (read, predict, arbitrate, score,
//! train) and the store path, across every engine mode.

use lvpsim_core::common::NO_PREDICTION;
use lvpsim_core::config::{Config, EngineMode};
use lvpsim_core::core::Engine;
use lvpsim_core::core::units::vp::PredictorKind;
use lvpsim_core::sim::SparseMemory;
use pretty_assertions::assert_eq;

use crate::common::harness::{ADDR, PC, TestContext, init_tracing};
use crate::common::mocks::memory::{ConstMemory, MockMemory, UnreadableMemory};

fn engine(mode: EngineMode) -> Engine {
    init_tracing();
    let mut config = Config::default();
    config.engine.mode = mode;
    Engine::new(&config)
}

// ══════════════════════════════════════════════════════════
// 1. Reading the actual value
// ══════════════════════════════════════════════════════════

/// Values are read little-endian and zero-extended to 64 bits.
#[test]
fn reads_little_endian_zero_extended() {
    let mut mem = SparseMemory::new();
    mem.write_bytes(ADDR, &[0x78, 0x56, 0x34, 0x12, 0xFF, 0xFF, 0xFF, 0xFF]);
    let mut e = engine(EngineMode::Hybrid);

    let out = e.on_load(&mem, PC, ADDR, 4).unwrap();
    assert_eq!(out.actual, 0x1234_5678);
    let out = e.on_load(&mem, PC, ADDR, 1).unwrap();
    assert_eq!(out.actual, 0x78);
    let out = e.on_load(&mem, PC, ADDR, 8).unwrap();
    assert_eq!(out.actual, 0xFFFF_FFFF_1234_5678);
}

/// The engine asks the collaborator for exactly `size` bytes at the address.
#[test]
fn safe_copy_receives_exact_request() {
    let mut mem = MockMemory::new();
    let _ = mem
        .expect_safe_copy()
        .withf(|&addr, buf| addr == ADDR && buf.len() == 2)
        .times(1)
        .returning(|_, buf| {
            buf.copy_from_slice(&[0x34, 0x12]);
            2
        });

    let mut e = engine(EngineMode::Hybrid);
    let out = e.on_load(&mem, PC, ADDR, 2).unwrap();
    assert_eq!(out.actual, 0x1234);
}

/// Oversized and zero-width loads are dropped before memory is touched.
#[test]
fn oversized_load_dropped() {
    let mut mem = MockMemory::new();
    let _ = mem.expect_safe_copy().never();

    let mut e = engine(EngineMode::Hybrid);
    assert!(e.on_load(&mem, PC, ADDR, 16).is_none());
    assert!(e.on_load(&mem, PC, ADDR, 0).is_none());

    let stats = e.stats();
    assert_eq!(stats.skipped_oversized, 2);
    assert_eq!(stats.total_loads, 0);
    assert_eq!(stats.correct_predictions, 0);
    assert_eq!(stats.incorrect_predictions, 0);
}

/// A short safe-copy drops the load and leaves all predictor state untouched.
#[test]
fn unreadable_load_changes_nothing() {
    let mut e = engine(EngineMode::Hybrid);
    for _ in 0..5 {
        let _ = e.on_load(&ConstMemory(9), PC, ADDR, 8);
    }
    let before = e.summary();

    let mut partial = MockMemory::new();
    let _ = partial
        .expect_safe_copy()
        .withf(|&addr, _| addr == ADDR)
        .returning(|_, _| 3);
    assert!(e.on_load(&partial, PC, ADDR, 8).is_none());
    assert!(e.on_load(&UnreadableMemory, PC, ADDR, 8).is_none());

    let after = e.summary();
    assert_eq!(after.loads.skipped_unreadable, 2);
    assert_eq!(after.loads.total_loads, before.loads.total_loads);
    assert_eq!(after.predictors, before.predictors);
    assert_eq!(e.stride().entry(PC).map(|s| s.last_value), Some(9));
}

/// Dropped loads move only the skip counters; every prediction statistic
/// keeps its value.
#[test]
fn dropped_loads_only_tally_skips() {
    let mut e = engine(EngineMode::Hybrid);
    for v in [4, 8, 12] {
        let _ = e.on_load(&ConstMemory(v), PC, ADDR, 8);
    }
    let before = e.stats().clone();

    assert!(e.on_load(&ConstMemory(16), PC, ADDR, 9).is_none());
    assert!(e.on_load(&UnreadableMemory, PC, ADDR, 8).is_none());

    let mut expected = before;
    expected.skipped_oversized += 1;
    expected.skipped_unreadable += 1;
    assert_eq!(e.stats(), &expected);
}

/// A narrower configured maximum drops wider loads.
#[test]
fn configured_max_width() {
    let mut config = Config::default();
    config.engine.max_access_bytes = 4;
    let mut e = Engine::new(&config);
    assert!(e.on_load(&ConstMemory(1), PC, ADDR, 8).is_none());
    assert!(e.on_load(&ConstMemory(1), PC, ADDR, 4).is_some());
    assert_eq!(e.stats().skipped_oversized, 1);
}

// ══════════════════════════════════════════════════════════
// 2. Hybrid end-to-end
// ══════════════════════════════════════════════════════════

/// A stored value is forwarded to a later load from the same address.
#[test]
fn store_then_load_forwards_value() {
    let mut ctx = TestContext::new();
    ctx.store(ADDR, 99);
    let out = ctx.load(PC, ADDR, 99).unwrap();
    assert_eq!(out.guesses.store_load, Some(99));
    assert_eq!(ctx.sim.engine.store_load().table().get(&ADDR), Some(&99));
}

/// Loads never train the store-to-load table in hybrid mode.
#[test]
fn hybrid_loads_do_not_train_store_table() {
    let mut ctx = TestContext::new();
    let _ = ctx.load_values(PC, ADDR, &[1, 2, 3]);
    assert!(ctx.sim.engine.store_load().table().is_empty());
}

/// Stride confidence builds on an arithmetic sequence and the arbitrated
/// prediction becomes correct.
#[test]
fn stride_sequence_converges() {
    let mut ctx = TestContext::new();
    let values: Vec<u64> = (0..50).map(|i| 1000 + 8 * i).collect();
    let outcomes = ctx.load_values(PC, ADDR, &values);

    assert!(outcomes[2..].iter().all(|o| o.guesses.stride == Some(o.actual)));
    assert!(outcomes[2..].iter().all(|o| o.is_correct()));
    let arb = ctx.sim.engine.arbiter();
    assert_eq!(arb.confidence(PredictorKind::Stride), 15);
}

/// Every predictor's confidence is scored against its own guess.
#[test]
fn confidence_uses_own_guess() {
    let mut ctx = TestContext::new();
    // A store makes the store-to-load guess right every time; the stride
    // guess is right from the second load on.
    for _ in 0..10 {
        ctx.store(ADDR, 5);
        let _ = ctx.load(PC, ADDR, 5);
    }
    let arb = ctx.sim.engine.arbiter();
    assert_eq!(arb.confidence(PredictorKind::StoreToLoad), 10);
    assert_eq!(arb.confidence(PredictorKind::Stride), 9);
}

/// Once store-to-load confidence leads, it supplies the final value.
#[test]
fn store_to_load_takes_over() {
    let mut ctx = TestContext::new();
    let mut winners = Vec::new();
    for i in 0..20u64 {
        // Values change unpredictably for the PC-keyed predictors.
        let v = (i * 7919) ^ 0xABCD;
        ctx.store(ADDR, v);
        winners.push(ctx.load(PC, ADDR, v).unwrap());
    }
    let last = winners.last().unwrap();
    assert_eq!(last.winner, PredictorKind::StoreToLoad);
    assert!(last.is_correct());
    assert!(ctx.sim.engine.arbiter().usage(PredictorKind::StoreToLoad) > 0);
}

/// The four-value cycle folds to one context once the history is full, so
/// the context predictor keeps guessing the previous value and never earns
/// any confidence.
#[test]
fn four_value_cycle_context_behavior() {
    let mut ctx = TestContext::with_mode(EngineMode::Context);
    let cycle = [10u64, 20, 30, 40];
    let mut outcomes = Vec::new();
    for _ in 0..24 {
        outcomes.extend(ctx.load_values(PC, ADDR, &cycle));
    }
    for pair in outcomes[4..].windows(2) {
        assert_eq!(pair[1].guesses.context, Some(pair[0].actual));
    }
    assert_eq!(ctx.sim.engine.arbiter().confidence(PredictorKind::Context), 0);
}

/// A load whose value never changes is predicted by context after warm-up
/// and the hit rate stays at 100% for every later load.
#[test]
fn constant_load_reaches_full_hit_rate() {
    let mut ctx = TestContext::with_mode(EngineMode::Context);
    let outcomes = ctx.load_values(PC, ADDR, &[42; 30]);
    assert!(!outcomes[0].is_correct());
    assert!(!outcomes[1].is_correct());
    assert!(outcomes[2..].iter().all(|o| o.is_correct()));

    let stats = ctx.sim.engine.stats();
    assert_eq!(stats.total_loads, 30);
    assert_eq!(stats.correct_predictions, 28);
    assert_eq!(stats.incorrect_predictions, 2);
}

/// A missing guess is compared as zero, so a zero-valued load counts as a hit.
#[test]
fn missing_guess_compares_as_zero() {
    let mut e = engine(EngineMode::Hybrid);
    let out = e.on_load(&ConstMemory(0), PC, ADDR, 8).unwrap();
    assert_eq!(out.guesses.stride, None);
    assert_eq!(out.predicted, NO_PREDICTION);
    assert!(out.is_correct());
    assert_eq!(e.arbiter().confidence(PredictorKind::Stride), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Single-strategy modes
// ══════════════════════════════════════════════════════════

/// Stride mode consults only the stride predictor.
#[test]
fn stride_mode_only_strides() {
    let mut ctx = TestContext::with_mode(EngineMode::Stride);
    let outcomes = ctx.load_values(PC, ADDR, &[3, 6, 9, 12]);
    assert!(outcomes.iter().all(|o| o.winner == PredictorKind::Stride));
    assert!(outcomes.iter().all(|o| o.guesses.context.is_none()));
    assert!(ctx.sim.engine.context().history(PC).is_none());

    let summary = ctx.sim.summary();
    assert_eq!(summary.predictors.len(), 1);
    assert_eq!(summary.predictors[0].kind, PredictorKind::Stride);
    assert_eq!(summary.predictors[0].usage, 4);
}

/// Store-to-load mode learns from stores and also trains on loads.
#[test]
fn store_to_load_mode_learns_from_loads() {
    let mut ctx = TestContext::with_mode(EngineMode::StoreToLoad);
    let first = ctx.load(PC, ADDR, 77).unwrap();
    assert_eq!(first.guesses.store_load, None);
    let second = ctx.load(PC + 4, ADDR, 77).unwrap();
    assert_eq!(second.guesses.store_load, Some(77));
    assert!(second.is_correct());

    ctx.store(ADDR, 5);
    assert_eq!(ctx.sim.engine.store_load().table().get(&ADDR), Some(&5));
}

/// Context and stride modes count stores but never touch the store table.
#[test]
fn stores_ignored_outside_store_modes() {
    for mode in [EngineMode::Context, EngineMode::Stride] {
        let mut e = engine(mode);
        e.on_store(ADDR, 1);
        assert_eq!(e.stats().stores_observed, 1);
        assert!(e.store_load().table().is_empty());
    }
}
