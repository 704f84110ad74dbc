//! Simulator error and access fault definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Access Faults:** Reasons a single load event is dropped by the engine.
//! 2. **Simulator Errors:** Configuration, trace parsing, and I/O failures reported
//!    to the driver. None of these originate inside the prediction core.

use std::io;

use thiserror::Error;

/// Reason a load event could not be checked against memory.
///
/// Access faults never propagate out of the engine: the event is dropped,
/// logged, and counted as skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessFault {
    /// The access is zero bytes wide or wider than the supported maximum.
    #[error("unsupported access width of {size} bytes (max {max})")]
    UnsupportedWidth {
        /// Requested width in bytes.
        size: usize,
        /// Widest supported access in bytes.
        max: usize,
    },

    /// The safe-copy primitive returned fewer bytes than requested.
    #[error("memory read failed at {addr:#x}: copied {copied} of {size} bytes")]
    Unreadable {
        /// Address of the failed read.
        addr: u64,
        /// Bytes actually copied.
        copied: usize,
        /// Bytes requested.
        size: usize,
    },
}

/// Errors reported by the simulator outside the prediction hot path.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration field holds a value the engine cannot run with.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `context.history_length`).
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },

    /// A JSON document (configuration or report) could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A trace line could not be parsed.
    #[error("trace line {line}: {source}")]
    TraceParse {
        /// One-based line number in the trace.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The requested synthetic workload does not exist.
    #[error("unknown workload '{0}'")]
    UnknownWorkload(String),

    /// An I/O operation failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl SimError {
    /// Builds an [`SimError::InvalidConfig`] for `field`.
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
