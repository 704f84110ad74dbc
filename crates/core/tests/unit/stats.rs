//! Statistics and Report Tests.
//!
//! Verifies hit-rate arithmetic, the per-predictor breakdown, section
//! filtering, and JSON output.

use lvpsim_core::config::EngineMode;
use lvpsim_core::core::units::vp::PredictorKind;
use lvpsim_core::stats::{EngineStats, REPORT_SECTIONS};
use pretty_assertions::assert_eq;

use crate::common::harness::{ADDR, PC, TestContext};

/// No loads means a 0% hit rate, not a division by zero.
#[test]
fn hit_rate_without_loads() {
    assert!(EngineStats::default().hit_rate().abs() < f64::EPSILON);
}

/// Hit rate is a percentage of processed loads.
#[test]
fn hit_rate_percentage() {
    let stats = EngineStats {
        total_loads: 8,
        correct_predictions: 6,
        incorrect_predictions: 2,
        ..EngineStats::default()
    };
    assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
}

/// The hybrid summary lists all three predictors and balances its counters.
#[test]
fn hybrid_summary() {
    let mut ctx = TestContext::new();
    ctx.store(ADDR, 1);
    let _ = ctx.load_values(PC, ADDR, &[1, 1, 1, 1]);

    let s = ctx.sim.summary();
    assert_eq!(s.mode, EngineMode::Hybrid);
    assert_eq!(s.loads.total_loads, 4);
    assert_eq!(
        s.loads.correct_predictions + s.loads.incorrect_predictions,
        s.loads.total_loads
    );
    assert_eq!(s.loads.stores_observed, 1);
    assert_eq!(s.context_histories, 1);

    let kinds: Vec<_> = s.predictors.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, PredictorKind::ALL.to_vec());
    let usage: u64 = s.predictors.iter().map(|p| p.usage).sum();
    assert_eq!(usage, 4);
}

/// The text report carries the banner and only the requested sections.
#[test]
fn report_sections() {
    let mut ctx = TestContext::new();
    let _ = ctx.load_values(PC, ADDR, &[5, 10, 15]);
    let s = ctx.sim.summary();

    let full = s.to_string();
    assert!(full.contains("LOAD VALUE PREDICTION STATISTICS"));
    assert!(full.contains("loads.total              3"));
    assert!(full.contains("PREDICTORS"));
    assert!(full.contains("TABLES"));

    let only = vec!["tables".to_string()];
    let partial = s.sections(&only).to_string();
    assert!(partial.contains("TABLES"));
    assert!(!partial.contains("PREDICTORS"));
    assert!(!partial.contains("loads.total"));

    assert_eq!(REPORT_SECTIONS, &["summary", "predictors", "tables"]);
}

/// JSON output exposes the counters and predictor names.
#[test]
fn json_report() {
    let mut ctx = TestContext::with_mode(EngineMode::Stride);
    let _ = ctx.load_values(PC, ADDR, &[2, 4, 6, 8]);
    let json = ctx.sim.summary().to_json().unwrap();

    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["mode"], "Stride");
    assert_eq!(v["loads"]["total_loads"], 4);
    assert_eq!(v["loads"]["correct_predictions"], 2);
    assert_eq!(v["hit_rate"], 50.0);
    assert_eq!(v["predictors"][0]["kind"], "stride");
    assert_eq!(v["predictors"][0]["table"]["entries"], 1);
}
