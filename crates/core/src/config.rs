//! Configuration system for the load-value prediction simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the engine. It provides:
//! 1. **Defaults:** Baseline history length, table capacities, and confidence tuning.
//! 2. **Structures:** Hierarchical config for the engine and each predictor.
//! 3. **Enums:** Engine mode (hybrid or a single strategy).
//! 4. **Validation:** Rejection of values the predictors cannot operate with.
//!
//! Configuration is supplied as JSON (`Config::from_json_str`) or built from
//! `Config::default()` and adjusted field by field by the CLI.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::MAX_ACCESS_BYTES;
use crate::common::error::SimError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline predictor configuration when not
/// explicitly overridden in a JSON configuration document.
mod defaults {
    /// Number of recent values remembered per program counter by the
    /// context predictor.
    pub const HISTORY_LENGTH: usize = 4;

    /// Capacity of every bounded prediction table (1024 entries).
    pub const TABLE_SIZE: usize = 1024;

    /// Saturation ceiling of each confidence counter.
    pub const CONFIDENCE_CAP: u8 = 15;

    /// Amount subtracted from a confidence counter on a misprediction.
    pub const CONFIDENCE_PENALTY: u8 = 2;

    /// Confidence a non-fallback predictor must exceed to be selected.
    pub const CONFIDENCE_THRESHOLD: u8 = 3;

    /// Number of events between heartbeat log lines.
    pub const HEARTBEAT_INTERVAL: u64 = 100;
}

/// Prediction strategy the engine runs.
///
/// `Hybrid` composes all three predictors under the confidence arbiter;
/// the other modes run one predictor alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum EngineMode {
    /// Context, stride, and store-to-load predictors arbitrated by confidence.
    #[default]
    #[serde(alias = "hybrid")]
    Hybrid,
    /// Context (value history) predictor only.
    #[serde(alias = "context")]
    Context,
    /// Stride predictor only.
    #[serde(alias = "stride")]
    Stride,
    /// Store-to-load forwarding predictor only.
    ///
    /// In this mode the store table also learns from every load value.
    #[serde(alias = "store-to-load", alias = "storeToLoad")]
    StoreToLoad,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use lvpsim_core::config::{Config, EngineMode};
///
/// let config = Config::default();
/// assert_eq!(config.engine.mode, EngineMode::Hybrid);
/// assert_eq!(config.context.history_length, 4);
///
/// let json = r#"{
///     "engine": { "mode": "Stride" },
///     "context": { "history_length": 8 },
///     "confidence": { "cap": 7, "threshold": 2 }
/// }"#;
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.engine.mode, EngineMode::Stride);
/// assert_eq!(config.context.history_length, 8);
/// assert_eq!(config.context.table_size, 1024);
/// assert_eq!(config.confidence.penalty, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Engine-level settings
    #[serde(default)]
    pub engine: EngineConfig,
    /// Context predictor settings
    #[serde(default)]
    pub context: ContextConfig,
    /// Stride predictor settings
    #[serde(default)]
    pub stride: StrideConfig,
    /// Store-to-load predictor settings
    #[serde(default)]
    pub store_load: StoreLoadConfig,
    /// Confidence arbiter settings
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl Config {
    /// Parses and validates a configuration from a JSON document.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] if the document is malformed, or
    /// [`SimError::InvalidConfig`] if a field fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every field holds a value the engine can run with.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.engine.max_access_bytes == 0 || self.engine.max_access_bytes > MAX_ACCESS_BYTES {
            return Err(SimError::invalid(
                "engine.max_access_bytes",
                format!("must be in 1..={MAX_ACCESS_BYTES}"),
            ));
        }
        if self.context.history_length == 0 {
            return Err(SimError::invalid(
                "context.history_length",
                "must be at least 1",
            ));
        }
        if self.context.table_size == 0 {
            return Err(SimError::invalid("context.table_size", "must be non-zero"));
        }
        if self.stride.table_size == 0 {
            return Err(SimError::invalid("stride.table_size", "must be non-zero"));
        }
        if self.store_load.table_size == 0 {
            return Err(SimError::invalid(
                "store_load.table_size",
                "must be non-zero",
            ));
        }
        if self.confidence.cap == 0 {
            return Err(SimError::invalid("confidence.cap", "must be non-zero"));
        }
        if self.confidence.penalty == 0 {
            return Err(SimError::invalid("confidence.penalty", "must be non-zero"));
        }
        if self.confidence.threshold >= self.confidence.cap {
            return Err(SimError::invalid(
                "confidence.threshold",
                format!(
                    "must be below the cap ({}), otherwise only the fallback is ever selected",
                    self.confidence.cap
                ),
            ));
        }
        Ok(())
    }
}

/// Engine-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Prediction strategy
    #[serde(default)]
    pub mode: EngineMode,

    /// Widest load, in bytes, the engine reads back; wider loads are dropped
    #[serde(default = "EngineConfig::default_max_access_bytes")]
    pub max_access_bytes: usize,

    /// Events between heartbeat log lines (0 disables the heartbeat)
    #[serde(default = "EngineConfig::default_heartbeat_interval")]
    pub heartbeat_interval: u64,
}

impl EngineConfig {
    /// Returns the default maximum access width.
    fn default_max_access_bytes() -> usize {
        MAX_ACCESS_BYTES
    }

    /// Returns the default heartbeat interval.
    fn default_heartbeat_interval() -> u64 {
        defaults::HEARTBEAT_INTERVAL
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            max_access_bytes: MAX_ACCESS_BYTES,
            heartbeat_interval: defaults::HEARTBEAT_INTERVAL,
        }
    }
}

/// Context (value history) predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContextConfig {
    /// Number of recent values folded into each context key (K)
    #[serde(default = "ContextConfig::default_history_length")]
    pub history_length: usize,

    /// Capacity of the context value-prediction table
    #[serde(default = "default_table_size")]
    pub table_size: usize,
}

impl ContextConfig {
    /// Returns the default history length.
    fn default_history_length() -> usize {
        defaults::HISTORY_LENGTH
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            history_length: defaults::HISTORY_LENGTH,
            table_size: defaults::TABLE_SIZE,
        }
    }
}

/// Stride predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StrideConfig {
    /// Capacity of the per-PC stride table
    #[serde(default = "default_table_size")]
    pub table_size: usize,
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::TABLE_SIZE,
        }
    }
}

/// Store-to-load forwarding predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreLoadConfig {
    /// Capacity of the per-address store value table
    #[serde(default = "default_table_size")]
    pub table_size: usize,
}

impl Default for StoreLoadConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::TABLE_SIZE,
        }
    }
}

/// Confidence arbiter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfidenceConfig {
    /// Saturation ceiling of each counter
    #[serde(default = "ConfidenceConfig::default_cap")]
    pub cap: u8,

    /// Amount subtracted on a misprediction (clamped at zero)
    #[serde(default = "ConfidenceConfig::default_penalty")]
    pub penalty: u8,

    /// Confidence the context and store-to-load predictors must exceed to win
    #[serde(default = "ConfidenceConfig::default_threshold")]
    pub threshold: u8,
}

impl ConfidenceConfig {
    /// Returns the default counter ceiling.
    fn default_cap() -> u8 {
        defaults::CONFIDENCE_CAP
    }

    /// Returns the default misprediction penalty.
    fn default_penalty() -> u8 {
        defaults::CONFIDENCE_PENALTY
    }

    /// Returns the default selection threshold.
    fn default_threshold() -> u8 {
        defaults::CONFIDENCE_THRESHOLD
    }
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            cap: defaults::CONFIDENCE_CAP,
            penalty: defaults::CONFIDENCE_PENALTY,
            threshold: defaults::CONFIDENCE_THRESHOLD,
        }
    }
}

/// Returns the default capacity shared by all bounded tables.
fn default_table_size() -> usize {
    defaults::TABLE_SIZE
}
