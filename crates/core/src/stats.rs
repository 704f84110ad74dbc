//! Simulation statistics collection and reporting.
//!
//! This module tracks prediction metrics for the simulator. It provides:
//! 1. **Load counters:** Total, correct, and incorrect predictions, plus dropped events.
//! 2. **Predictor breakdown:** Per-predictor usage counts and final confidence.
//! 3. **Table occupancy:** Entries, capacity, and evictions of each bounded table.
//! 4. **Reporting:** Banner-formatted text sections and JSON.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::common::error::SimError;
use crate::config::EngineMode;
use crate::core::units::table::BoundedTable;
use crate::core::units::vp::PredictorKind;

/// Load and store counters maintained by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Loads that were read back and predicted.
    pub total_loads: u64,
    /// Loads whose final prediction matched the actual value.
    pub correct_predictions: u64,
    /// Loads whose final prediction did not match.
    pub incorrect_predictions: u64,
    /// Loads dropped because the access width was unsupported.
    pub skipped_oversized: u64,
    /// Loads dropped because memory could not be read.
    pub skipped_unreadable: u64,
    /// Stores reported with a known value.
    pub stores_observed: u64,
}

impl EngineStats {
    /// Percentage of predicted loads that were correct (0 when no loads ran).
    pub fn hit_rate(&self) -> f64 {
        if self.total_loads == 0 {
            0.0
        } else {
            100.0 * self.correct_predictions as f64 / self.total_loads as f64
        }
    }
}

/// Occupancy snapshot of one bounded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Entries currently stored.
    pub entries: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Entries evicted so far.
    pub evictions: u64,
}

impl TableStats {
    /// Captures the counters of `table`.
    pub fn of<K, V>(table: &BoundedTable<K, V>) -> Self
    where
        K: Copy + Eq + Hash,
    {
        Self {
            entries: table.len(),
            capacity: table.capacity(),
            evictions: table.evictions(),
        }
    }
}

/// Final state of one predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictorReport {
    /// Predictor identity.
    pub kind: PredictorKind,
    /// Times this predictor supplied the final prediction.
    pub usage: u64,
    /// Final confidence counter value.
    pub confidence: u8,
    /// Occupancy of the predictor's bounded table.
    pub table: TableStats,
}

/// End-of-run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Strategy the engine ran.
    pub mode: EngineMode,
    /// Load and store counters.
    pub loads: EngineStats,
    /// Percentage of predicted loads that were correct.
    pub hit_rate: f64,
    /// Program counters with a context history.
    pub context_histories: usize,
    /// Per-predictor breakdown, for every predictor the mode used.
    pub predictors: Vec<PredictorReport>,
}

/// Section names for selective report output.
///
/// Valid section identifiers: `"summary"`, `"predictors"`, `"tables"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const REPORT_SECTIONS: &[&str] = &["summary", "predictors", "tables"];

impl Summary {
    /// Prints only the requested report sections to stdout.
    ///
    /// Pass an empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.sections(sections));
    }

    /// Prints all report sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }

    /// Formats the requested sections; an empty slice selects all of them.
    pub fn sections<'a>(&'a self, sections: &'a [String]) -> impl fmt::Display + 'a {
        Report {
            summary: self,
            sections,
        }
    }

    /// Pretty-printed JSON rendering of the summary.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.sections(&[]), f)
    }
}

/// Section filter over a summary.
struct Report<'a> {
    summary: &'a Summary,
    sections: &'a [String],
}

impl Report<'_> {
    fn wants(&self, section: &str) -> bool {
        self.sections.is_empty() || self.sections.iter().any(|s| s == section)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        let rule = "----------------------------------------------------------";

        writeln!(f, "==========================================================")?;
        writeln!(f, "LOAD VALUE PREDICTION STATISTICS")?;
        writeln!(f, "==========================================================")?;

        if self.wants("summary") {
            writeln!(f, "mode                     {:?}", s.mode)?;
            writeln!(f, "loads.total              {}", s.loads.total_loads)?;
            writeln!(f, "loads.correct            {}", s.loads.correct_predictions)?;
            writeln!(f, "loads.incorrect          {}", s.loads.incorrect_predictions)?;
            writeln!(f, "loads.hit_rate           {:.2}%", s.hit_rate)?;
            writeln!(f, "loads.skipped_oversized  {}", s.loads.skipped_oversized)?;
            writeln!(f, "loads.skipped_unreadable {}", s.loads.skipped_unreadable)?;
            writeln!(f, "stores.observed          {}", s.loads.stores_observed)?;
            writeln!(f, "{rule}")?;
        }
        if self.wants("predictors") {
            let total = s.loads.total_loads.max(1) as f64;
            writeln!(f, "PREDICTORS")?;
            for p in &s.predictors {
                writeln!(
                    f,
                    "  {:<14} used: {:<10} ({:.2}%) | confidence: {}",
                    p.kind.name(),
                    p.usage,
                    100.0 * p.usage as f64 / total,
                    p.confidence
                )?;
            }
            writeln!(f, "{rule}")?;
        }
        if self.wants("tables") {
            writeln!(f, "TABLES")?;
            for p in &s.predictors {
                writeln!(
                    f,
                    "  {:<14} entries: {:<6} / {:<6} | evictions: {}",
                    p.kind.name(),
                    p.table.entries,
                    p.table.capacity,
                    p.table.evictions
                )?;
            }
            writeln!(f, "  context histories: {}", s.context_histories)?;
        }
        writeln!(f, "==========================================================")
    }
}
