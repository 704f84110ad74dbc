//! Stride Predictor Tests.
//!
//! Verifies that the stride predictor establishes a baseline on first sight,
//! learns the latest delta, and predicts with wrapping arithmetic.

use lvpsim_core::config::StrideConfig;
use lvpsim_core::core::units::vp::{PredictorKind, StrideEntry, StridePredictor, ValuePredictor};
use rstest::rstest;

fn predictor(table_size: usize) -> StridePredictor {
    StridePredictor::new(&StrideConfig { table_size })
}

// ══════════════════════════════════════════════════════════
// 1. Cold start
// ══════════════════════════════════════════════════════════

/// An unseen PC has no prediction.
#[test]
fn unseen_pc_has_no_prediction() {
    let p = predictor(16);
    assert_eq!(p.kind(), PredictorKind::Stride);
    assert_eq!(p.predict(0x400), None);
}

/// The first value only sets the baseline; the stride stays zero.
#[test]
fn first_value_sets_baseline() {
    let mut p = predictor(16);
    p.train(0x400, 100);
    assert_eq!(
        p.entry(0x400),
        Some(&StrideEntry {
            last_value: 100,
            stride: 0,
            valid: true,
        })
    );
    assert_eq!(p.predict(0x400), Some(100));
}

// ══════════════════════════════════════════════════════════
// 2. Stride learning
// ══════════════════════════════════════════════════════════

/// After two values of an arithmetic sequence, every later value is predicted.
#[rstest]
#[case(0, 4)]
#[case(1000, -8)]
#[case(7, 0)]
fn arithmetic_sequence(#[case] start: i64, #[case] step: i64) {
    let mut p = predictor(16);
    let values: Vec<u64> = (0..20).map(|i| (start + step * i) as u64).collect();

    p.train(0x400, values[0]);
    p.train(0x400, values[1]);
    for &v in &values[2..] {
        assert_eq!(p.predict(0x400), Some(v));
        p.train(0x400, v);
    }
}

/// The stride tracks the most recent delta only.
#[test]
fn stride_follows_latest_delta() {
    let mut p = predictor(16);
    for v in [10, 20, 25] {
        p.train(0x400, v);
    }
    assert_eq!(p.entry(0x400).map(|e| e.stride), Some(5));
    assert_eq!(p.predict(0x400), Some(30));
}

/// Deltas and predictions wrap around the 64-bit range.
#[test]
fn wraps_across_u64_boundary() {
    let mut p = predictor(16);
    p.train(0x400, u64::MAX - 1);
    p.train(0x400, u64::MAX);
    assert_eq!(p.predict(0x400), Some(0));

    let mut down = predictor(16);
    down.train(0x400, 1);
    down.train(0x400, 0);
    assert_eq!(down.entry(0x400).map(|e| e.stride), Some(-1));
    assert_eq!(down.predict(0x400), Some(u64::MAX));
}

// ══════════════════════════════════════════════════════════
// 3. Per-PC isolation and capacity
// ══════════════════════════════════════════════════════════

/// Different PCs keep independent strides.
#[test]
fn pcs_are_independent() {
    let mut p = predictor(16);
    for i in 0..3u64 {
        p.train(0x400, i * 4);
        p.train(0x404, 100 - i);
    }
    assert_eq!(p.predict(0x400), Some(12));
    assert_eq!(p.predict(0x404), Some(97));
}

/// The table is bounded; the oldest PC is forgotten first.
#[test]
fn table_is_bounded() {
    let mut p = predictor(2);
    p.train(0x400, 1);
    p.train(0x404, 2);
    p.train(0x408, 3);
    assert_eq!(p.entry(0x400), None);
    assert_eq!(p.predict(0x408), Some(3));

    let stats = p.table_stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.capacity, 2);
    assert_eq!(stats.evictions, 1);
}
